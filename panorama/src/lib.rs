//! Synthetic horizon panoramas.
//!
//! A [`Panorama`] is one terrain ray per image column, fanned out
//! around a compass bearing at the angular spacing of one terrain
//! sample at the maximum scan distance.

mod error;
mod math;
pub mod raster;

pub use crate::error::PanoramaError;
use geo::geometry::Coord;
use image::RgbaImage;
use log::{info, warn};
use nasadem::{is_void, Elev, C};
use terrain::{look, EarthShape, Projector, Ray, Tiles};

pub struct Panorama {
    /// Rays ordered left to right (clockwise).
    rays: Vec<Ray>,

    /// Meters between samples of every ray.
    step_m: C,

    /// Radians between adjacent columns.
    d_bearing: C,

    /// Ground elevation at the observer plus eye height.
    eye_elevation_m: C,

    /// Paint samples at exactly sea level as water.
    oceanfront: bool,
}

impl Panorama {
    pub fn builder() -> PanoramaBuilder {
        PanoramaBuilder {
            observer: None,
            bearing: None,
            span: 60.0,
            distance_km: 500.0,
            eye_height_m: 1.8,
            oceanfront: false,
            void_default: 0,
        }
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn width(&self) -> usize {
        self.rays.len()
    }

    pub fn step_m(&self) -> C {
        self.step_m
    }

    pub fn d_bearing(&self) -> C {
        self.d_bearing
    }

    pub fn eye_elevation_m(&self) -> C {
        self.eye_elevation_m
    }

    pub fn to_image(&self) -> RgbaImage {
        raster::render(&self.rays, self.oceanfront)
    }
}

pub struct PanoramaBuilder {
    observer: Option<Coord<C>>,

    /// Compass bearing of the image center (degrees).
    bearing: Option<C>,

    /// Horizontal field of view (degrees).
    span: C,

    /// Maximum scan distance.
    distance_km: C,

    /// Eye height above local ground (meters).
    eye_height_m: C,

    oceanfront: bool,

    /// Elevation assumed beyond the far end of a ray that ends in
    /// voids.
    void_default: Elev,
}

impl PanoramaBuilder {
    pub fn observer(mut self, coord: Coord<C>) -> Self {
        self.observer = Some(coord);
        self
    }

    pub fn bearing(mut self, degrees: C) -> Self {
        self.bearing = Some(degrees);
        self
    }

    pub fn span(mut self, degrees: C) -> Self {
        self.span = degrees;
        self
    }

    pub fn distance_km(mut self, km: C) -> Self {
        self.distance_km = km;
        self
    }

    pub fn eye_height(mut self, meters: C) -> Self {
        self.eye_height_m = meters;
        self
    }

    pub fn oceanfront(mut self, oceanfront: bool) -> Self {
        self.oceanfront = oceanfront;
        self
    }

    pub fn void_default(mut self, elevation: Elev) -> Self {
        self.void_default = elevation;
        self
    }

    pub fn build(&self, tiles: &Tiles, earth: &EarthShape) -> Result<Panorama, PanoramaError> {
        let observer = self.observer.ok_or(PanoramaError::Builder("observer"))?;
        let bearing = self.bearing.ok_or(PanoramaError::Builder("bearing"))?;
        if !(self.span.is_finite() && self.span > 0.0 && self.span <= 360.0) {
            return Err(PanoramaError::Invalid(format!("span {}", self.span)));
        }
        if !self.eye_height_m.is_finite() {
            return Err(PanoramaError::Invalid(format!(
                "eye height {}",
                self.eye_height_m
            )));
        }

        let step_m = earth.sample_step_m(tiles.resolution());
        let range_m = self.distance_km * 1000.0;
        if !(range_m.is_finite() && range_m > step_m) {
            return Err(PanoramaError::Invalid(format!(
                "scan distance {} km is shorter than one sample",
                self.distance_km
            )));
        }
        let d_bearing = (step_m / range_m).asin();

        let ground = tiles.elevation(observer)?;
        let ground = if is_void(ground) {
            warn!("no elevation under observer {observer:?}, assuming sea level");
            0
        } else {
            ground
        };
        let eye_elevation_m = C::from(ground) + self.eye_height_m;
        info!("eye elevation {eye_elevation_m} m");

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let width = (self.span.to_radians() / d_bearing).ceil() as usize;
        let first = bearing - self.span / 2.0;
        info!(
            "{width} columns from {first:.3}° to {:.3}°, {:.6}° apart",
            first + self.span,
            d_bearing.to_degrees()
        );

        let projector = Projector::new(earth, step_m, eye_elevation_m, d_bearing, raster::HORIZON);
        let mut rays = Vec::with_capacity(width);
        for column in 0..width {
            let compass = (first + (column as C * d_bearing).to_degrees()).rem_euclid(360.0);
            let ray = look(tiles, earth, observer, compass, range_m, step_m)?
                .fill_voids(self.void_default)
                .project(&projector);
            rays.push(ray);
        }

        Ok(Panorama {
            rays,
            step_m,
            d_bearing,
            eye_elevation_m,
            oceanfront: self.oceanfront,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{raster, Panorama, PanoramaError};
    use approx::assert_relative_eq;
    use geo::geometry::Coord;
    use nasadem::synthetic;
    use tempfile::TempDir;
    use terrain::{EarthShape, TileMode, Tiles};

    /// Four flat sea-level tiles covering 0..2°N, 0..2°E.
    fn ocean() -> (TempDir, Tiles) {
        let dir = tempfile::tempdir().unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            synthetic::write_flat_tile(dir.path(), Coord { x, y }, 3, 0).unwrap();
        }
        let tiles = Tiles::new(dir.path().to_path_buf(), TileMode::MemMap, 3).unwrap();
        (dir, tiles)
    }

    const OBSERVER: Coord = Coord { x: 1.0, y: 1.0 };

    #[test]
    fn test_missing_parameters() {
        let (_dir, tiles) = ocean();
        let earth = EarthShape::globe();
        assert!(matches!(
            Panorama::builder().bearing(0.0).build(&tiles, &earth),
            Err(PanoramaError::Builder("observer"))
        ));
        assert!(matches!(
            Panorama::builder().observer(OBSERVER).build(&tiles, &earth),
            Err(PanoramaError::Builder("bearing"))
        ));
        assert!(matches!(
            Panorama::builder()
                .observer(OBSERVER)
                .bearing(0.0)
                .distance_km(0.01)
                .build(&tiles, &earth),
            Err(PanoramaError::Invalid(_))
        ));
    }

    #[test]
    fn test_columns_fan_clockwise() {
        let (_dir, tiles) = ocean();
        let earth = EarthShape::globe();
        let panorama = Panorama::builder()
            .observer(OBSERVER)
            .bearing(0.0)
            .span(1.0)
            .distance_km(20.0)
            .build(&tiles, &earth)
            .unwrap();
        let d_bearing = panorama.d_bearing().to_degrees();
        let expected_width = (1.0 / d_bearing).ceil() as usize;
        assert_eq!(panorama.width(), expected_width);
        let bearings: Vec<f64> = panorama.rays().iter().map(|r| r.bearing).collect();
        assert_relative_eq!(bearings[0], 359.5, epsilon = 1e-9);
        assert_relative_eq!(bearings[1], 359.5 + d_bearing, epsilon = 1e-9);
        assert!(bearings[bearings.len() - 1] < 0.5);
        assert_relative_eq!(panorama.eye_elevation_m(), 1.8);
    }

    #[test]
    fn test_ocean_horizon_follows_curvature() {
        let (_dir, tiles) = ocean();
        let earth = EarthShape::globe();
        let eye_height = 100.0;
        let panorama = Panorama::builder()
            .observer(OBSERVER)
            .bearing(45.0)
            .span(2.0)
            .distance_km(50.0)
            .eye_height(eye_height)
            .oceanfront(true)
            .build(&tiles, &earth)
            .unwrap();

        let step = panorama.step_m();
        let d_bearing = panorama.d_bearing();
        let samples = panorama.rays()[0].len();
        let expected = (1..samples)
            .map(|i| {
                let distance = i as f64 * step;
                let theta = ((-earth.drop_m(distance) - eye_height) / distance).atan();
                raster::HORIZON - 1 - (theta / d_bearing).round() as i32
            })
            .min()
            .unwrap();
        // The horizon is below eye level.
        assert!(expected > raster::HORIZON - 1);

        let image = panorama.to_image();
        assert_eq!(image.height(), raster::HEIGHT);
        for x in 0..image.width() {
            let top = (0..image.height())
                .find(|&y| *image.get_pixel(x, y) != raster::SKY)
                .unwrap();
            assert_eq!(top as i32, expected, "column {x}");
            assert_eq!(*image.get_pixel(x, top), raster::RIDGE);
            assert_eq!(*image.get_pixel(x, top + 1), raster::WATER);
            let ridges = (0..image.height())
                .filter(|&y| *image.get_pixel(x, y) == raster::RIDGE)
                .count();
            assert_eq!(ridges, 1);
        }
    }
}
