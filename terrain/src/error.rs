use nasadem::NasademError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("invalid earth shape: {0}")]
    Config(String),

    #[error("no tile {name} under {root}")]
    TileNotFound { name: String, root: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no height files in {0}")]
    Path(PathBuf),

    #[error("{0}")]
    Nasadem(#[from] NasademError),
}
