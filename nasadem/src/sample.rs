use crate::{Dms, Elev, Tile};

/// An elevation sample and its geographic location.
pub struct Sample<'a> {
    /// The parent [Tile] this grid square belongs to.
    tile: &'a Tile,
    /// Index into parent's elevation data corresponding to this grid
    /// square.
    index: usize,
    lat: Dms,
    lon: Dms,
}

impl<'a> Sample<'a> {
    /// Sample elevation in meters.
    #[inline]
    pub fn elevation(&self) -> Elev {
        self.tile.samples.get_linear_unchecked(self.index)
    }

    /// This sample's offset in the source tile's memory.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// This sample's (column, row) in the source tile.
    ///
    /// Note that (0, 0) is the NW corner.
    #[inline]
    pub fn xy(&self) -> (usize, usize) {
        let (cols, _) = self.tile.dimensions();
        (self.index % cols, self.index / cols)
    }

    #[inline]
    pub fn lat(&self) -> Dms {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> Dms {
        self.lon
    }
}

/// Walks a tile's samples in storage order.
///
/// Coordinates are stepped with [`Dms::add_seconds`] by the tile's
/// per-sample deltas, restarting each row at the west edge.
pub struct Samples<'a> {
    tile: &'a Tile,
    index: usize,
    lat: Dms,
    lon: Dms,
    west: Dms,
}

impl<'a> Samples<'a> {
    pub(crate) fn new(tile: &'a Tile) -> Self {
        let sw_corner = tile.sw_corner();
        let north = Dms::from_total_seconds((i32::from(sw_corner.y) + 1) * 3600);
        let west = Dms::from_total_seconds(i32::from(sw_corner.x) * 3600);
        Self {
            tile,
            index: 0,
            lat: north,
            lon: west,
            west,
        }
    }
}

impl<'a> Iterator for Samples<'a> {
    type Item = Sample<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.tile.len() {
            return None;
        }
        let sample = Sample {
            tile: self.tile,
            index: self.index,
            lat: self.lat,
            lon: self.lon,
        };
        self.index += 1;

        let name = self.tile.name();
        let (cols, _) = self.tile.dimensions();
        let advanced = if self.index % cols == 0 {
            self.lat.add_seconds(name.d_lat).map(|lat| (lat, self.west))
        } else {
            self.lon.add_seconds(name.d_lon).map(|lon| (self.lat, lon))
        };
        match advanced {
            Some((lat, lon)) => {
                self.lat = lat;
                self.lon = lon;
            }
            None => self.index = self.tile.len(),
        }

        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tile.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Samples<'a> {}
