use crate::{bearing::compass_to_cartesian, EarthModel, TerrainError};
use geo::geometry::Coord;
use log::warn;
use nasadem::C;

/// Radius of the ordinary globe in miles.
pub const GLOBE_MILES: C = 3959.0;

pub const METERS_PER_MILE: C = 1609.344;

/// Shape of the earth a panorama is rendered against.
///
/// Built once and passed by reference; nothing reads the shape from
/// global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthShape {
    /// Signed radius in meters. Zero selects the flat disk and
    /// infinity the flat plane.
    radius_m: C,

    /// Coefficient of refraction. Always zero unless the model is
    /// [`EarthModel::Spherical`].
    refraction: C,

    model: EarthModel,
}

impl EarthShape {
    pub fn new(radius_m: C, refraction: C) -> Result<Self, TerrainError> {
        if radius_m.is_nan() {
            return Err(TerrainError::Config("radius is not a number".to_string()));
        }

        let model = if radius_m == 0.0 {
            EarthModel::AzimuthalEquidistant
        } else if radius_m.is_infinite() {
            EarthModel::Equirectangular
        } else if radius_m > 0.0 {
            EarthModel::Spherical
        } else {
            EarthModel::Hollow
        };

        let refraction = match model {
            EarthModel::Spherical => {
                if !refraction.is_finite() || refraction >= 1.0 {
                    return Err(TerrainError::Config(format!(
                        "coefficient of refraction {refraction} must be finite and less than 1"
                    )));
                }
                refraction
            }
            _ => {
                if refraction != 0.0 {
                    warn!("ignoring coefficient of refraction {refraction} for {model:?} earth");
                }
                0.0
            }
        };

        Ok(Self {
            radius_m,
            refraction,
            model,
        })
    }

    pub fn from_miles(radius_miles: C, refraction: C) -> Result<Self, TerrainError> {
        Self::new(radius_miles * METERS_PER_MILE, refraction)
    }

    /// The ordinary globe without refraction.
    pub fn globe() -> Self {
        Self {
            radius_m: GLOBE_MILES * METERS_PER_MILE,
            refraction: 0.0,
            model: EarthModel::Spherical,
        }
    }

    pub fn model(&self) -> EarthModel {
        self.model
    }

    pub fn radius_m(&self) -> C {
        self.radius_m
    }

    pub fn refraction(&self) -> C {
        self.refraction
    }

    /// Radius bent by refraction, `R / (1 - k)`.
    pub fn effective_radius_m(&self) -> C {
        self.radius_m / (1.0 - self.refraction)
    }

    /// Meters in one degree of arc along a meridian.
    ///
    /// Movement always uses the unrefracted magnitude of the radius.
    /// The flat models borrow the ordinary globe's.
    pub fn degree_in_meters(&self) -> C {
        let radius = self.radius_m.abs();
        let radius = if radius.is_finite() && radius != 0.0 {
            radius
        } else {
            GLOBE_MILES * METERS_PER_MILE
        };
        radius * std::f64::consts::TAU / 360.0
    }

    /// Height the surface falls away below the tangent plane at
    /// `distance_m`. Negative on a hollow earth, zero on the flat
    /// models.
    pub fn drop_m(&self, distance_m: C) -> C {
        match self.model {
            EarthModel::Spherical | EarthModel::Hollow => {
                let radius = self.effective_radius_m();
                let magnitude = radius.abs() * (1.0 - (distance_m / radius.abs()).cos());
                magnitude.copysign(radius)
            }
            EarthModel::Equirectangular | EarthModel::AzimuthalEquidistant => 0.0,
        }
    }

    /// Meters between samples of a tile with `resolution` arc-seconds
    /// spacing, measured along a meridian.
    pub fn sample_step_m(&self, resolution: u8) -> C {
        self.degree_in_meters() * C::from(resolution) / 3600.0
    }

    /// Moves `distance_m` from `from` along the compass bearing
    /// `compass` (degrees clockwise from north).
    pub fn travel(&self, from: Coord<C>, compass: C, distance_m: C) -> Coord<C> {
        self.model.travel(
            from,
            compass_to_cartesian(compass),
            distance_m,
            self.degree_in_meters(),
        )
    }
}

impl Default for EarthShape {
    fn default() -> Self {
        Self::globe()
    }
}
