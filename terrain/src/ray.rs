use crate::{fill_voids, Projector};
use nasadem::{Elev, C};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaySample {
    /// Elevation in meters. May be [`nasadem::VOID`] until
    /// [`Ray::fill_voids`].
    pub elevation: Elev,

    /// Pixels above the horizon, set by [`Ray::project`].
    pub projected: i32,

    /// Image row, set by [`Ray::project`].
    pub row: i32,
}

/// Terrain samples along one bearing, nearest (the observer) first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    /// Compass bearing in degrees.
    pub bearing: C,

    pub samples: Vec<RaySample>,
}

impl Ray {
    pub fn new(bearing: C, elevations: impl IntoIterator<Item = Elev>) -> Self {
        let samples = elevations
            .into_iter()
            .map(|elevation| RaySample {
                elevation,
                ..Default::default()
            })
            .collect();
        Self { bearing, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn elevations(&self) -> impl Iterator<Item = Elev> + '_ {
        self.samples.iter().map(|s| s.elevation)
    }

    /// Returns this ray with voids interpolated, see [`fill_voids`].
    #[must_use]
    pub fn fill_voids(self, default: Elev) -> Self {
        let raw: Vec<Elev> = self.elevations().collect();
        Self::new(self.bearing, fill_voids(&raw, default))
    }

    /// Returns this ray with every sample's projected offset and row
    /// filled in.
    #[must_use]
    pub fn project(mut self, projector: &Projector) -> Self {
        for (index, sample) in self.samples.iter_mut().enumerate() {
            sample.projected = projector.project(index, sample.elevation);
            sample.row = projector.row(sample.projected);
        }
        self
    }
}
