use crate::{bearing::compass_to_cartesian, EarthShape, Ray, TerrainError, Tiles};
use geo::geometry::Coord;
use log::debug;
use nasadem::C;

/// Samples terrain outward from `observer` along a compass bearing.
///
/// The first sample is the observer's own position. Each following
/// sample is one `step_m` past the previous one, moved with the
/// earth's movement model, until `max_distance_m` is reached.
pub fn look(
    tiles: &Tiles,
    earth: &EarthShape,
    observer: Coord<C>,
    compass_bearing: C,
    max_distance_m: C,
    step_m: C,
) -> Result<Ray, TerrainError> {
    if !(step_m.is_finite() && step_m > 0.0) {
        return Err(TerrainError::Config(format!("invalid step size {step_m}")));
    }
    if !(max_distance_m.is_finite() && max_distance_m >= 0.0) {
        return Err(TerrainError::Config(format!(
            "invalid scan distance {max_distance_m}"
        )));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (max_distance_m / step_m).floor() as usize;
    let model = earth.model();
    let cartesian = compass_to_cartesian(compass_bearing);
    let degree_in_meters = earth.degree_in_meters();

    let mut elevations = Vec::with_capacity(steps + 1);
    let mut point = observer;
    elevations.push(tiles.elevation(point)?);
    for _ in 0..steps {
        point = model.travel(point, cartesian, step_m, degree_in_meters);
        elevations.push(tiles.elevation(point)?);
    }
    debug!(
        "bearing {compass_bearing:.3}: {} samples ending at {point:?}",
        elevations.len()
    );

    Ok(Ray::new(compass_bearing, elevations))
}
