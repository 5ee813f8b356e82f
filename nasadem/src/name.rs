use crate::Dms;
use geo::geometry::Coord;

/// Identifies a tile by its southwest corner.
///
/// Tiles are stored north-to-south, west-to-east regardless of
/// hemisphere, so the signed per-sample deltas are the same
/// everywhere: rows step toward smaller latitudes, columns toward
/// larger longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileName {
    /// Integer (lon, lat) of the southwest corner.
    pub sw_corner: Coord<i16>,

    /// Signed arc-seconds of latitude between consecutive rows.
    pub d_lat: i32,

    /// Signed arc-seconds of longitude between consecutive columns.
    pub d_lon: i32,
}

impl TileName {
    pub fn from_sw_corner(sw_corner: Coord<i16>, resolution: u8) -> Self {
        let res = i32::from(resolution);
        // Storage order is the same in every hemisphere; the offset
        // flip keyed on the coordinate's sign handles the south and west.
        Self {
            sw_corner,
            d_lat: -res,
            d_lon: res,
        }
    }

    /// Returns the name of the tile a locator assigns `(lat, lon)` to.
    ///
    /// North and east coordinates truncate down to the tile below and
    /// to the left. South and west coordinates round outward, so a
    /// coordinate on a degree line belongs to the tile on its
    /// southwest side only in the northeast quadrant.
    ///
    /// The antimeridian, at either ±180°, belongs to `W180`.
    pub fn containing(lat: &Dms, lon: &Dms, resolution: u8) -> Self {
        let outward = |angle: &Dms| {
            if angle.is_negative() {
                -(angle.degrees().abs() + 1)
            } else {
                angle.degrees()
            }
        };
        let x = if is_antimeridian(lon) { -180 } else { outward(lon) };
        #[allow(clippy::cast_possible_truncation)]
        let sw_corner = Coord {
            x: x as i16,
            y: outward(lat) as i16,
        };
        Self::from_sw_corner(sw_corner, resolution)
    }

    /// Returns the expected file name for this tile.
    pub fn file_name(&self) -> String {
        let Coord { x, y } = self.sw_corner;
        let (n_s, lat) = {
            let lat = y.abs();
            let n_s = if y.is_negative() { 'S' } else { 'N' };
            (n_s, lat)
        };
        let (e_w, lon) = {
            let lon = x.abs();
            let e_w = if x.is_negative() { 'W' } else { 'E' };
            (e_w, lon)
        };
        format!("{n_s}{lat:02}{e_w}{lon:03}.hgt")
    }
}

/// Returns true for a longitude of exactly ±180°.
pub(crate) fn is_antimeridian(lon: &Dms) -> bool {
    lon.total_seconds().abs() == 180 * 3600
}
