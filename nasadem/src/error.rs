use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NasademError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid HGT name {0}")]
    HgtName(PathBuf),

    #[error("invalid HGT file len {0} for {1}")]
    HgtLen(u64, PathBuf),

    #[error("{path} has {found} arcsecond samples, expected {expected}")]
    Resolution {
        expected: u8,
        found: u8,
        path: PathBuf,
    },

    #[error("{lat}, {lon} is not located in {path}")]
    NotInTile {
        lat: String,
        lon: String,
        path: PathBuf,
    },

    #[error("offset {offset} out of range for {path} ({len} bytes)")]
    OffsetOutOfRange {
        offset: usize,
        len: usize,
        path: PathBuf,
    },

    #[error("could not unpack sample at offset {offset} of {path}")]
    MalformedSample { offset: usize, path: PathBuf },
}
