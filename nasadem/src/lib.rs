//! SRTM/NASADEM elevation (`.hgt`) file format.
//!
//! Tiles are addressed by degree-minute-second coordinates quantized
//! to the tile's sample spacing, see [`Dms`] and [`TileName`].
//!
//! # References
//!
//! 1. [30-Meter SRTM Tile Downloader](https://dwtkns.com/srtm30m)
//! 1. [HGT file layout](https://www.researchgate.net/profile/Pierre-Boulanger-4/publication/228924813/figure/fig8/AS:300852653903880@1448740270695/Description-of-a-HGT-file-structure-The-name-file-in-this-case-is-N20W100HGT.png)
//! 1. [Archive Team](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod dms;
mod error;
mod name;
mod sample;
#[cfg(any(test, feature = "synthetic"))]
pub mod synthetic;

pub use crate::{
    dms::Dms,
    error::NasademError,
    name::TileName,
    sample::{Sample, Samples},
};
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::Coord;
use memmap2::Mmap;
use std::{
    fs::File,
    io::BufReader,
    mem::size_of,
    path::{Path, PathBuf},
};

/// Base floating point type used for all coordinates and calculations.
pub type C = f64;

/// Bit representation of elevation samples.
pub type Elev = i16;

/// Sentinel for samples with no recorded elevation.
pub const VOID: Elev = -32768;

/// Returns true if `elevation` is the no-data sentinel.
#[inline]
pub fn is_void(elevation: Elev) -> bool {
    elevation == VOID
}

pub struct Tile {
    /// File this tile was read from.
    path: PathBuf,

    /// Southwest corner and sample deltas.
    name: TileName,

    /// Arcseconds per sample.
    resolution: u8,

    /// Number of (columns, rows) in this tile.
    dimensions: (usize, usize),

    /// Elevation samples.
    samples: SampleStore,
}

enum SampleStore {
    InMem(Box<[Elev]>),
    MemMap(Mmap),
}

impl SampleStore {
    fn len_bytes(&self) -> usize {
        match self {
            Self::InMem(samples) => samples.len() * size_of::<Elev>(),
            Self::MemMap(raw) => raw.len(),
        }
    }

    fn get_linear_unchecked(&self, index: usize) -> Elev {
        match self {
            Self::InMem(samples) => samples[index],
            Self::MemMap(raw) => {
                let start = index * size_of::<Elev>();
                parse_sample(&raw[start..start + size_of::<Elev>()])
            }
        }
    }
}

impl Tile {
    /// Returns a Tile read into memory from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NasademError> {
        let (resolution, dimensions @ (cols, rows)) = extract_resolution(&path)?;
        let sw_corner = parse_sw_corner(&path)?;

        let mut file = BufReader::new(File::open(&path)?);

        let samples = {
            let mut sample_store = Vec::with_capacity(cols * rows);

            for _ in 0..(cols * rows) {
                let sample = file.read_i16::<BE>()?;
                sample_store.push(sample);
            }

            SampleStore::InMem(sample_store.into_boxed_slice())
        };

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            name: TileName::from_sw_corner(sw_corner, resolution),
            resolution,
            dimensions,
            samples,
        })
    }

    /// Returns a Tile using the memory-mapped file as storage.
    pub fn memmap<P: AsRef<Path>>(path: P) -> Result<Self, NasademError> {
        let (resolution, dimensions) = extract_resolution(&path)?;
        let sw_corner = parse_sw_corner(&path)?;

        let samples = {
            let file = File::open(&path)?;
            // The tile directory is read-only external data; nothing
            // in this process writes to a mapped tile.
            let mmap = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap(mmap)
        };

        Ok(Self {
            path: path.as_ref().to_path_buf(),
            name: TileName::from_sw_corner(sw_corner, resolution),
            resolution,
            dimensions,
            samples,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> TileName {
        self.name
    }

    /// Returns the integer (lon, lat) of this tile's SW corner.
    pub fn sw_corner(&self) -> Coord<i16> {
        self.name.sw_corner
    }

    /// Returns this tile's (columns, rows) dimensions.
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the number of samples in this tile.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        let (x, y) = self.dimensions();
        x * y
    }

    /// Returns this tile's resolution in arcseconds per sample.
    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Returns the byte offset of the sample nearest `(lat, lon)`.
    ///
    /// Within a row, the sample index is the arc-seconds past the
    /// whole degree divided by the sample spacing. It counts from the
    /// far edge of the tile (`samples - index - 1`) when the delta's
    /// sign disagrees with the coordinate's, which is how overlap rows
    /// and columns shared with a neighbor are reached.
    pub fn offset(&self, lat: &Dms, lon: &Dms) -> Result<usize, NasademError> {
        let owner = TileName::containing(lat, lon, self.resolution);
        if owner.sw_corner != self.name.sw_corner {
            return Err(NasademError::NotInTile {
                lat: lat.to_string(),
                lon: lon.to_string(),
                path: self.path.clone(),
            });
        }
        let (cols, rows) = self.dimensions;
        let row = edge_offset(lat, self.name.d_lat, rows);
        // Both signs of the antimeridian are the west edge of W180.
        let col = if name::is_antimeridian(lon) {
            0
        } else {
            edge_offset(lon, self.name.d_lon, cols)
        };
        Ok((row * cols + col) * size_of::<Elev>())
    }

    /// Returns the raw sample nearest `(lat, lon)`.
    ///
    /// Voids are returned verbatim as [`VOID`].
    pub fn get_dms(&self, lat: &Dms, lon: &Dms) -> Result<Elev, NasademError> {
        let offset = self.offset(lat, lon)?;
        self.sample_at(offset)
    }

    /// Returns the sample at raster `(column, row)`, where row 0 is
    /// the north edge.
    pub fn get_xy(&self, (x, y): (usize, usize)) -> Option<Elev> {
        let (cols, rows) = self.dimensions;
        if x < cols && y < rows {
            Some(self.samples.get_linear_unchecked(y * cols + x))
        } else {
            None
        }
    }

    /// Returns an iterator over this tile's samples and their
    /// coordinates.
    pub fn iter(&self) -> Samples<'_> {
        Samples::new(self)
    }
}

/// Private API
impl Tile {
    fn sample_at(&self, offset: usize) -> Result<Elev, NasademError> {
        let len = self.samples.len_bytes();
        if offset + size_of::<Elev>() > len {
            return Err(NasademError::OffsetOutOfRange {
                offset,
                len,
                path: self.path.clone(),
            });
        }
        match &self.samples {
            SampleStore::InMem(samples) => Ok(samples[offset / size_of::<Elev>()]),
            SampleStore::MemMap(raw) => {
                let mut bytes = &raw[offset..offset + size_of::<Elev>()];
                bytes
                    .read_i16::<BE>()
                    .map_err(|_| NasademError::MalformedSample {
                        offset,
                        path: self.path.clone(),
                    })
            }
        }
    }
}

fn edge_offset(angle: &Dms, delta: i32, samples: usize) -> usize {
    let within = (angle.minutes() * 60 + angle.seconds()).unsigned_abs() / delta.unsigned_abs();
    let within = within as usize;
    if delta.signum() == angle.signum() {
        within
    } else {
        samples - within - 1
    }
}

fn extract_resolution<P: AsRef<Path>>(path: P) -> Result<(u8, (usize, usize)), NasademError> {
    const RES_1_ARCSECONDS_FILE_LEN: u64 = 3601 * 3601 * size_of::<u16>() as u64;
    const RES_3_ARCSECONDS_FILE_LEN: u64 = 1201 * 1201 * size_of::<u16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        RES_1_ARCSECONDS_FILE_LEN => Ok((1, (3601, 3601))),
        RES_3_ARCSECONDS_FILE_LEN => Ok((3, (1201, 1201))),
        invalid_len => Err(NasademError::HgtLen(
            invalid_len,
            path.as_ref().to_path_buf(),
        )),
    }
}

fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<i16>, NasademError> {
    let mk_err = || NasademError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?;
    if name.len() != 7 {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" | "n" => 1,
        "S" | "s" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &name[3..4] {
        "E" | "e" => 1,
        "W" | "w" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord { x: lon, y: lat })
}

// Parses a big-endian Elev from a slice of two bytes.
//
// # Panics
//
// Panics if the provided slice is not two bytes in length.
fn parse_sample(src: &[u8]) -> Elev {
    let mut sample_bytes = [0u8; 2];
    sample_bytes.copy_from_slice(src);
    Elev::from_be_bytes(sample_bytes)
}

#[cfg(test)]
mod tests {
    use super::{
        extract_resolution, is_void, parse_sample, parse_sw_corner, synthetic, Coord, Dms, Elev,
        NasademError, Tile, TileName, VOID,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Elevation pattern keyed by global sample position so that
    /// neighboring tiles agree on their overlap.
    fn pattern(lat_secs: i32, lon_secs: i32) -> Elev {
        let lon_secs = lon_secs.rem_euclid(360 * 3600);
        let value = (lat_secs / 3 * 31 + lon_secs / 3 * 17).rem_euclid(4000) - 100;
        Elev::try_from(value).unwrap()
    }

    fn tile_dir(corners: &[(i16, i16)]) -> (TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = corners
            .iter()
            .map(|&(x, y)| synthetic::write_tile(dir.path(), Coord { x, y }, 3, pattern).unwrap())
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_parse_hgt_name() {
        let (_dir, paths) = tile_dir(&[(-72, 44)]);
        let sw_corner = parse_sw_corner(&paths[0]).unwrap();
        let resolution = extract_resolution(&paths[0]).unwrap();
        assert_eq!(sw_corner, Coord { x: -72, y: 44 });
        assert_eq!(resolution, (3, (1201, 1201)));

        assert_eq!(
            parse_sw_corner("/tiles/s11e130.hgt").unwrap(),
            Coord { x: 130, y: -11 }
        );
        assert!(matches!(
            parse_sw_corner("/tiles/X44W072.hgt"),
            Err(NasademError::HgtName(_))
        ));
        assert!(matches!(
            parse_sw_corner("/tiles/N44W72.hgt"),
            Err(NasademError::HgtName(_))
        ));
    }

    #[test]
    fn test_bad_file_len() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("N44W072.hgt");
        std::fs::write(&path, [0u8; 10]).unwrap();
        assert!(matches!(
            Tile::load(&path),
            Err(NasademError::HgtLen(10, _))
        ));
    }

    #[test]
    fn test_tile_open() {
        let (_dir, paths) = tile_dir(&[(-72, 44)]);
        let loaded = Tile::load(&paths[0]).unwrap();
        let mapped = Tile::memmap(&paths[0]).unwrap();
        assert_eq!(loaded.len(), 1201 * 1201);
        assert_eq!(loaded.sw_corner(), Coord { x: -72, y: 44 });
        assert_eq!(mapped.resolution(), 3);
        for xy in [(0, 0), (1200, 0), (0, 1200), (1200, 1200), (600, 17)] {
            assert_eq!(loaded.get_xy(xy), mapped.get_xy(xy));
        }
        assert_eq!(loaded.get_xy((1201, 0)), None);
        assert_eq!(loaded.get_xy((0, 1201)), None);
    }

    #[test]
    fn test_north_row_offsets() {
        let (_dir, paths) = tile_dir(&[(-119, 37)]);
        let tile = Tile::load(&paths[0]).unwrap();
        let bytes_per_row = 1201 * 2;
        // 37°N is the southern overlap row of N37.
        let lat = Dms::new(37, 0, 0).unwrap();
        let lon = Dms::new(-118, -30, 0).unwrap();
        assert_eq!(tile.offset(&lat, &lon).unwrap(), 1200 * bytes_per_row + 600 * 2);
        let lat = Dms::new(37, 59, 57).unwrap();
        assert_eq!(tile.offset(&lat, &lon).unwrap(), bytes_per_row + 600 * 2);
    }

    #[test]
    fn test_get_dms_all_quadrants() {
        let (_dir, paths) = tile_dir(&[(-72, 44), (130, -11), (-71, -34), (18, 33)]);
        let tiles: Vec<Tile> = paths.iter().map(|p| Tile::memmap(p).unwrap()).collect();
        let coords = [
            (44.2705, -71.30325),
            (44.0, -71.0),
            (-10.5, 130.25),
            (-10.0, 130.999),
            (-33.9, -70.6),
            (-33.000_1, -70.000_1),
            (33.9, 18.4),
            (33.5, 18.0),
        ];
        for (lat, lon) in coords {
            let lat = Dms::from_decimal(lat, 3);
            let lon = Dms::from_decimal(lon, 3);
            let owner = TileName::containing(&lat, &lon, 3);
            let tile = tiles
                .iter()
                .find(|t| t.sw_corner() == owner.sw_corner)
                .unwrap();
            assert_eq!(
                tile.get_dms(&lat, &lon).unwrap(),
                pattern(lat.total_seconds(), lon.total_seconds()),
                "{lat} {lon}"
            );
        }
    }

    #[test]
    fn test_wrong_tile_is_rejected() {
        let (_dir, paths) = tile_dir(&[(-72, 44)]);
        let tile = Tile::load(&paths[0]).unwrap();
        let lat = Dms::from_decimal(46.0, 3);
        let lon = Dms::from_decimal(-71.5, 3);
        assert!(matches!(
            tile.get_dms(&lat, &lon),
            Err(NasademError::NotInTile { .. })
        ));
    }

    #[test]
    fn test_out_of_range_offset() {
        let (_dir, paths) = tile_dir(&[(-72, 44)]);
        let tile = Tile::memmap(&paths[0]).unwrap();
        let len = 1201 * 1201 * 2;
        assert!(tile.sample_at(len - 2).is_ok());
        assert!(matches!(
            tile.sample_at(len),
            Err(NasademError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_iter_coordinates_agree_with_offsets() {
        // In the northwest quadrant the locator assigns every row and
        // column but the north and west overlaps to the tile. In the
        // southwest quadrant both edges of each axis belong to
        // neighbors.
        let (_dir, paths) = tile_dir(&[(-72, 44), (-1, -1)]);
        for (path, expected) in paths.iter().zip([1200 * 1200, 1199 * 1199]) {
            let tile = Tile::load(path).unwrap();
            let name = tile.name();
            let mut owned = 0;
            for sample in tile.iter() {
                let (lat, lon) = (sample.lat(), sample.lon());
                assert_eq!(
                    sample.elevation(),
                    pattern(lat.total_seconds(), lon.total_seconds())
                );
                if TileName::containing(&lat, &lon, 3) == name {
                    owned += 1;
                    assert_eq!(tile.offset(&lat, &lon).unwrap(), sample.index() * 2);
                }
            }
            assert_eq!(owned, expected);
        }
    }

    #[test]
    fn test_iter_walks_whole_tile() {
        let (_dir, paths) = tile_dir(&[(-1, -1)]);
        let tile = Tile::load(&paths[0]).unwrap();
        let samples: Vec<_> = tile.iter().collect();
        assert_eq!(samples.len(), tile.len());
        let first = &samples[0];
        let last = &samples[samples.len() - 1];
        assert_eq!(first.xy(), (0, 0));
        assert_eq!(first.lat(), Dms::new(0, 0, 0).unwrap());
        assert_eq!(first.lon(), Dms::new(-1, 0, 0).unwrap());
        assert_eq!(last.xy(), (1200, 1200));
        assert_eq!(last.lat(), Dms::new(-1, 0, 0).unwrap());
        assert_eq!(last.lon(), Dms::new(0, 0, 0).unwrap());
    }

    #[test]
    fn test_overlap_edges_match() {
        let (_dir, paths) = tile_dir(&[(-72, 45), (-72, 44), (-73, 44)]);
        let north = Tile::load(&paths[0]).unwrap();
        let south = Tile::load(&paths[1]).unwrap();
        let west = Tile::load(&paths[2]).unwrap();
        for i in 0..1201 {
            assert_eq!(north.get_xy((i, 1200)), south.get_xy((i, 0)));
            assert_eq!(west.get_xy((1200, i)), south.get_xy((0, i)));
        }
        // 45°N is read from the northern tile's overlap row.
        let lat = Dms::from_decimal(45.0, 3);
        let lon = Dms::from_decimal(-71.5, 3);
        assert_eq!(north.get_dms(&lat, &lon).unwrap(), south.get_xy((600, 0)).unwrap());
    }

    #[test]
    fn test_antimeridian_reads_west_edge_of_w180() {
        let (_dir, paths) = tile_dir(&[(179, 51), (-180, 51)]);
        let east = Tile::load(&paths[0]).unwrap();
        let west = Tile::memmap(&paths[1]).unwrap();
        let lat = Dms::from_decimal(51.5, 3);
        for lon in [-180.0, 180.0, 179.9996] {
            let lon = Dms::from_decimal(lon, 3);
            assert_eq!(TileName::containing(&lat, &lon, 3), west.name());
            assert_eq!(west.offset(&lat, &lon).unwrap(), 600 * 1201 * 2);
            assert_eq!(west.get_dms(&lat, &lon).unwrap(), east.get_xy((1200, 600)).unwrap());
        }
        // One sample short of the line stays in E179.
        let lon = Dms::from_decimal(179.999, 3);
        assert_eq!(east.get_dms(&lat, &lon).unwrap(), east.get_xy((1199, 600)).unwrap());
        assert!(matches!(
            west.get_dms(&lat, &lon),
            Err(NasademError::NotInTile { .. })
        ));
    }

    #[test]
    fn test_void() {
        assert!(is_void(VOID));
        assert!(!is_void(0));
        assert_eq!(parse_sample(&[0x80, 0x00]), VOID);
        assert_eq!(parse_sample(&[0x88, 0x88]), -30584);
    }
}
