//! Synthetic `.hgt` tiles for tests and benchmarks.

use crate::{Elev, TileName};
use byteorder::{BigEndian as BE, WriteBytesExt};
use geo::geometry::Coord;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes a one degree tile with SW corner `sw_corner` into `dir`.
///
/// `elevation` is called with the signed (latitude, longitude)
/// arc-seconds of every sample, so tiles generated from the same
/// closure agree on their shared edges.
pub fn write_tile<P, F>(
    dir: P,
    sw_corner: Coord<i16>,
    resolution: u8,
    elevation: F,
) -> std::io::Result<PathBuf>
where
    P: AsRef<Path>,
    F: Fn(i32, i32) -> Elev,
{
    let name = TileName::from_sw_corner(sw_corner, resolution);
    let path = dir.as_ref().join(name.file_name());
    let samples = 3600 / i32::from(resolution) + 1;
    let north = (i32::from(sw_corner.y) + 1) * 3600;
    let west = i32::from(sw_corner.x) * 3600;

    let mut out = BufWriter::new(File::create(&path)?);
    for row in 0..samples {
        for col in 0..samples {
            let lat = north + row * name.d_lat;
            let lon = west + col * name.d_lon;
            out.write_i16::<BE>(elevation(lat, lon))?;
        }
    }
    out.flush()?;
    Ok(path)
}

/// Writes a tile where every sample is `elevation`.
pub fn write_flat_tile<P: AsRef<Path>>(
    dir: P,
    sw_corner: Coord<i16>,
    resolution: u8,
    elevation: Elev,
) -> std::io::Result<PathBuf> {
    write_tile(dir, sw_corner, resolution, |_, _| elevation)
}
