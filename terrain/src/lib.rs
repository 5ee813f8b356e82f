//! Terrain sampling for horizon panoramas.
//!
//! [`Tiles`] finds and caches elevation tiles, [`look`] marches rays
//! over them using an [`EarthShape`], and [`Projector`] turns the
//! sampled elevations into image rows.

pub mod bearing;
mod earth;
mod error;
mod look;
mod movement;
mod projection;
mod ray;
mod tiles;
mod voids;

pub use crate::{
    earth::{EarthShape, GLOBE_MILES, METERS_PER_MILE},
    error::TerrainError,
    look::look,
    movement::EarthModel,
    projection::Projector,
    ray::{Ray, RaySample},
    tiles::{TileMode, Tiles},
    voids::fill_voids,
};
