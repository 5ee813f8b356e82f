use crate::EarthShape;
use nasadem::{Elev, C};

/// Maps ray samples to image rows.
///
/// A sample's pixel offset from the horizon is its elevation angle,
/// as seen from the eye after the curvature drop, in units of the
/// angle between adjacent columns.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    earth: EarthShape,

    /// Meters between consecutive ray samples.
    step_m: C,

    /// Absolute eye elevation, ground plus eye height.
    eye_elevation_m: C,

    /// Radians between adjacent bearing columns.
    d_bearing: C,

    /// Image row just below the horizon line.
    horizon: i32,
}

impl Projector {
    pub fn new(
        earth: &EarthShape,
        step_m: C,
        eye_elevation_m: C,
        d_bearing: C,
        horizon: i32,
    ) -> Self {
        Self {
            earth: *earth,
            step_m,
            eye_elevation_m,
            d_bearing,
            horizon,
        }
    }

    /// Returns the pixel offset above the horizon of `elevation`
    /// sampled `index` steps from the eye.
    ///
    /// The eye's own sample is straight down.
    pub fn project(&self, index: usize, elevation: Elev) -> i32 {
        let theta = if index == 0 {
            -std::f64::consts::FRAC_PI_2
        } else {
            let distance = index as C * self.step_m;
            let apparent = C::from(elevation) - self.earth.drop_m(distance) - self.eye_elevation_m;
            (apparent / distance).atan()
        };
        #[allow(clippy::cast_possible_truncation)]
        let projected = (theta / self.d_bearing.abs()).round() as i32;
        projected
    }

    /// Returns the image row of a projected offset, where row 0 is
    /// the top of the image.
    pub fn row(&self, projected: i32) -> i32 {
        self.horizon - 1 - projected
    }
}
