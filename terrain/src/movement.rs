use geo::geometry::Coord;
use nasadem::C;

/// How a move over the terrain maps onto latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarthModel {
    /// Convex globe.
    Spherical,

    /// Infinite radius: longitude behaves exactly like latitude.
    Equirectangular,

    /// Zero radius: the north pole is the center of a disk and
    /// latitude is the distance from it.
    AzimuthalEquidistant,

    /// Negative radius: concave globe, moves like [`Self::Spherical`].
    Hollow,
}

impl EarthModel {
    /// Returns the (lon, lat) reached by moving `distance_m` meters
    /// from `from` along `cartesian_bearing` (degrees counterclockwise
    /// from east).
    ///
    /// `degree_in_meters` is the length of one degree of arc along a
    /// meridian.
    pub fn travel(
        self,
        from: Coord<C>,
        cartesian_bearing: C,
        distance_m: C,
        degree_in_meters: C,
    ) -> Coord<C> {
        let theta = cartesian_bearing.to_radians();
        let (sin, cos) = theta.sin_cos();
        let (x, y) = match self {
            Self::Spherical | Self::Hollow => {
                let d_lat = sin * distance_m / degree_in_meters;
                // Meridians converge by the cosine of the move's
                // average latitude.
                let midpoint = (from.y + d_lat / 2.0).to_radians();
                let d_lon = cos * distance_m / (degree_in_meters * midpoint.cos());
                (from.x + d_lon, from.y + d_lat)
            }
            Self::Equirectangular => {
                let d_lat = sin * distance_m / degree_in_meters;
                let d_lon = cos * distance_m / degree_in_meters;
                (from.x + d_lon, from.y + d_lat)
            }
            Self::AzimuthalEquidistant => {
                let radius = 90.0 - from.y;
                let angle = from.x.to_radians();
                // North points at the pole, which is `angle + 180°` in
                // the plane, so east is a quarter turn short of that.
                let heading = angle + std::f64::consts::FRAC_PI_2 + theta;
                let step = distance_m / degree_in_meters;
                let px = radius * angle.cos() + step * heading.cos();
                let py = radius * angle.sin() + step * heading.sin();
                (py.atan2(px).to_degrees(), 90.0 - px.hypot(py))
            }
        };
        Coord {
            x: wrap_longitude(x),
            y,
        }
    }
}

/// Returns `lon` wrapped to `[-180, 180)`.
fn wrap_longitude(lon: C) -> C {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
