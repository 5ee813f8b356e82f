//! Degree-minute-second angles quantized to sample spacing.

use crate::C;
use std::fmt;

const SECS_PER_MIN: i32 = 60;
const SECS_PER_DEG: i32 = 3600;

/// An angle as a (degrees, minutes, seconds) triple.
///
/// All three components share one sign. Minutes and seconds are
/// always in `(-60, 60)`.
#[derive(Debug, Clone, Copy)]
pub struct Dms {
    degrees: i32,
    minutes: i32,
    seconds: i32,

    /// Working sign used for carries (`1` or `-1`).
    ///
    /// Follows the components, except for an exact-zero angle where
    /// the first nonzero [`Dms::add_seconds`] decides it.
    sign: i32,
}

impl Dms {
    /// Returns a `Dms` from an existing triple.
    ///
    /// Returns `None` if the components have mixed signs or minutes or
    /// seconds are out of range.
    pub fn new(degrees: i32, minutes: i32, seconds: i32) -> Option<Self> {
        let components = [degrees, minutes, seconds];
        let sign = components
            .iter()
            .map(|c| c.signum())
            .find(|&s| s != 0)
            .unwrap_or(1);
        let uniform = components.iter().all(|c| c.signum() != -sign);
        if uniform && minutes.abs() < SECS_PER_MIN && seconds.abs() < SECS_PER_MIN {
            Some(Self {
                degrees,
                minutes,
                seconds,
                sign,
            })
        } else {
            None
        }
    }

    /// Returns the `Dms` closest to decimal `value`, with seconds
    /// rounded to a multiple of `resolution` arc-seconds.
    pub fn from_decimal(value: C, resolution: u8) -> Self {
        let spacing = C::from(resolution.max(1));
        #[allow(clippy::cast_possible_truncation)]
        let total = ((value.abs() * C::from(SECS_PER_DEG) / spacing).round() * spacing) as i32;
        if value < 0.0 {
            Self::from_total_seconds(-total)
        } else {
            Self::from_total_seconds(total)
        }
    }

    /// Returns a `Dms` from a signed count of arc-seconds.
    pub fn from_total_seconds(total: i32) -> Self {
        let sign = if total < 0 { -1 } else { 1 };
        let magnitude = total.abs();
        Self {
            degrees: sign * (magnitude / SECS_PER_DEG),
            minutes: sign * (magnitude % SECS_PER_DEG / SECS_PER_MIN),
            seconds: sign * (magnitude % SECS_PER_MIN),
            sign,
        }
    }

    pub fn degrees(&self) -> i32 {
        self.degrees
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    /// Returns this angle in decimal degrees.
    pub fn to_decimal(&self) -> C {
        C::from(self.degrees)
            + C::from(self.minutes) / C::from(SECS_PER_MIN)
            + C::from(self.seconds) / C::from(SECS_PER_DEG)
    }

    /// Returns this angle as a signed count of arc-seconds.
    pub fn total_seconds(&self) -> i32 {
        self.degrees * SECS_PER_DEG + self.minutes * SECS_PER_MIN + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.degrees == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Returns true for angles strictly below zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.sign < 0
    }

    /// Returns `-1` for negative angles, otherwise `1`.
    pub fn signum(&self) -> i32 {
        if self.is_negative() {
            -1
        } else {
            1
        }
    }

    /// Returns this angle advanced by `seconds` arc-seconds.
    ///
    /// Increments must be sample sized: they divide a minute evenly
    /// and the current seconds component, so overflow always lands
    /// exactly on ±60. Overflow carries one unit in the direction of
    /// the increment's sign, cascading from seconds to minutes to
    /// degrees. Degrees never wrap (there is no way to know if this is
    /// a latitude or longitude).
    ///
    /// Returns `None` for increments that are not sample-aligned.
    #[must_use]
    pub fn add_seconds(self, seconds: i32) -> Option<Self> {
        if seconds == 0 {
            return Some(self);
        }
        let magnitude = seconds.abs();
        if magnitude > SECS_PER_MIN
            || SECS_PER_MIN % magnitude != 0
            || self.seconds % magnitude != 0
        {
            return None;
        }

        let step = seconds.signum();
        let sign = if self.is_zero() { step } else { self.sign };
        let overflows = |v: i32| v.abs() == SECS_PER_MIN || (v != 0 && v.signum() != sign);

        let mut degrees = self.degrees;
        let mut minutes = self.minutes;
        let mut seconds = self.seconds + seconds;
        if overflows(seconds) {
            seconds = floor_mod(seconds, sign * SECS_PER_MIN);
            minutes += step;
            if overflows(minutes) {
                minutes = floor_mod(minutes, sign * SECS_PER_MIN);
                degrees += step;
            }
        }

        Some(Self {
            degrees,
            minutes,
            seconds,
            sign,
        })
    }
}

impl PartialEq for Dms {
    fn eq(&self, other: &Self) -> bool {
        (self.degrees, self.minutes, self.seconds) == (other.degrees, other.minutes, other.seconds)
    }
}

impl Eq for Dms {}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}°{:02}'{:02}\"",
            self.degrees.abs(),
            self.minutes.abs(),
            self.seconds.abs()
        )
    }
}

/// Remainder taking the sign of the divisor.
fn floor_mod(lhs: i32, rhs: i32) -> i32 {
    ((lhs % rhs) + rhs) % rhs
}
