//! Compass and cartesian bearings.
//!
//! Compass bearings are clockwise degrees from north. Cartesian
//! bearings are counterclockwise degrees from east. Both are
//! normalized to `(-180, 180]`.

use nasadem::C;

/// Returns `degrees` normalized to `(-180, 180]`.
pub fn normalize(degrees: C) -> C {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

pub fn compass_to_cartesian(compass: C) -> C {
    normalize(90.0 - compass)
}

/// Inverse of [`compass_to_cartesian`], which is its own inverse.
pub fn cartesian_to_compass(cartesian: C) -> C {
    normalize(90.0 - cartesian)
}

#[cfg(test)]
mod tests {
    use super::{cartesian_to_compass, compass_to_cartesian, normalize};
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize() {
        assert_relative_eq!(normalize(180.0), 180.0);
        assert_relative_eq!(normalize(-180.0), 180.0);
        assert_relative_eq!(normalize(270.0), -90.0);
        assert_relative_eq!(normalize(-190.0), 170.0);
        assert_relative_eq!(normalize(725.0), 5.0);
    }

    #[test]
    fn test_known_conversions() {
        assert_relative_eq!(compass_to_cartesian(0.0), 90.0);
        assert_relative_eq!(compass_to_cartesian(90.0), 0.0);
        assert_relative_eq!(compass_to_cartesian(270.0), 180.0);
        assert_relative_eq!(compass_to_cartesian(180.0), -90.0);
    }

    #[test]
    fn test_involution() {
        let mut x = -720.0;
        while x < 720.0 {
            let twice = cartesian_to_compass(compass_to_cartesian(x));
            assert_relative_eq!(twice, normalize(x), epsilon = 1e-9);
            x += 7.25;
        }
    }
}
