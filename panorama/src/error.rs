use terrain::TerrainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanoramaError {
    #[error("missing required parameter {0}")]
    Builder(&'static str),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Terrain(#[from] TerrainError),

    #[error("{0}")]
    Image(#[from] image::ImageError),
}
