//! On-demand tile cache.

use crate::TerrainError;
use dashmap::DashMap;
use geo::geometry::Coord;
use log::debug;
use nasadem::{Dms, Elev, NasademError, Tile, TileName, C};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// How many directory levels below the root are searched for tiles.
const SEARCH_DEPTH: usize = 2;

pub struct Tiles {
    /// Directory containing HGT tile files, possibly nested in
    /// subdirectories.
    tile_dir: PathBuf,

    /// How to load tiles (in-memory or mapped).
    tile_mode: TileMode,

    /// Arc-seconds between samples of every tile.
    resolution: u8,

    /// Tiles which have been loaded on demand.
    ///
    /// Entries live until this value is dropped.
    tiles: DashMap<Coord<i16>, Arc<Tile>>,
}

impl Tiles {
    pub fn new(tile_dir: PathBuf, tile_mode: TileMode, resolution: u8) -> Result<Self, TerrainError> {
        if !matches!(resolution, 1 | 3) {
            return Err(TerrainError::Config(format!(
                "unsupported tile resolution {resolution}"
            )));
        }

        // Let's try to fail early be checking that tile_dir has at
        // least one `hgt` file.
        if has_height_files(&tile_dir, SEARCH_DEPTH)? {
            Ok(Self {
                tile_dir,
                tile_mode,
                resolution,
                tiles: DashMap::new(),
            })
        } else {
            Err(TerrainError::Path(tile_dir))
        }
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Returns the tile the locator assigns `(lat, lon)` to.
    ///
    /// `Tiles` will attempt to fetch the tile from disk if it doesn't
    /// already have it in memory.
    pub fn get(&self, lat: &Dms, lon: &Dms) -> Result<Arc<Tile>, TerrainError> {
        let name = TileName::containing(lat, lon, self.resolution);
        self.tiles
            .entry(name.sw_corner)
            .or_try_insert_with(|| self.load_tile(&name).map(Arc::new))
            .map(|r| r.clone())
    }

    /// Returns the raw elevation sample nearest `coord`.
    pub fn elevation(&self, coord: Coord<C>) -> Result<Elev, TerrainError> {
        let lat = Dms::from_decimal(coord.y, self.resolution);
        let lon = Dms::from_decimal(coord.x, self.resolution);
        let tile = self.get(&lat, &lon)?;
        Ok(tile.get_dms(&lat, &lon)?)
    }

    /// Returns the path of the file holding tile `name`.
    ///
    /// Searches the tile directory, then each directory below it up
    /// to two levels deep, for the exact file name and then its
    /// lowercase form.
    pub fn locate(&self, name: &TileName) -> Result<PathBuf, TerrainError> {
        let file_name = name.file_name();
        let candidates = [file_name.clone(), file_name.to_lowercase()];
        for dir in search_dirs(&self.tile_dir, SEARCH_DEPTH)? {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() {
                    return Ok(path);
                }
            }
        }
        Err(TerrainError::TileNotFound {
            name: file_name,
            root: self.tile_dir.clone(),
        })
    }
}

/// Private API.
impl Tiles {
    fn load_tile(&self, name: &TileName) -> Result<Tile, TerrainError> {
        let tile_path = self.locate(name)?;
        debug!("loading {tile_path:?}");
        let tile = match self.tile_mode {
            TileMode::InMem => Tile::load(&tile_path)?,
            TileMode::MemMap => Tile::memmap(&tile_path)?,
        };
        if tile.resolution() != self.resolution {
            return Err(NasademError::Resolution {
                expected: self.resolution,
                found: tile.resolution(),
                path: tile_path,
            }
            .into());
        }
        Ok(tile)
    }
}

/// How to handle tile.
///
/// The trade off between loading tile data into memory versus memory
/// mapping is not obvious, and you should measure both before
/// deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    /// Parse tile and load into memory.
    ///
    /// Note that this can consume gigabytes of RAM when loading many
    /// tiles.
    InMem,

    /// Memory map file contents.
    MemMap,
}

fn is_hgt(path: &Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .map_or(false, |ext| ext.eq_ignore_ascii_case("hgt"))
}

/// Returns `root` followed by every directory below it, breadth
/// first, at most `depth` levels down.
fn search_dirs(root: &Path, depth: usize) -> Result<Vec<PathBuf>, TerrainError> {
    let mut dirs = vec![root.to_path_buf()];
    let mut level = vec![root.to_path_buf()];
    for _ in 0..depth {
        let mut next = Vec::new();
        for dir in &level {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    next.push(path);
                }
            }
        }
        next.sort();
        dirs.extend(next.iter().cloned());
        level = next;
    }
    Ok(dirs)
}

fn has_height_files(root: &Path, depth: usize) -> Result<bool, TerrainError> {
    for dir in search_dirs(root, depth)? {
        for entry in std::fs::read_dir(&dir)? {
            if is_hgt(&entry?.path()) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
