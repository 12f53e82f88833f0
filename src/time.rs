//! Advertising interval arithmetic.
//!
//! Advertising intervals are communicated to the controller in units of 0.625 ms, the resolution
//! of the interval fields in the advertising parameter commands. [`AdvInterval`] stores that raw
//! unit count and converts from and to wall-clock values.
//!
//! The rotation itself is driven by an external periodic timer with a period of
//! [`TICK_PERIOD_SECS`]; this crate never arms a timer on its own.
//!
//! [`AdvInterval`]: struct.AdvInterval.html
//! [`TICK_PERIOD_SECS`]: constant.TICK_PERIOD_SECS.html

use core::fmt;

/// Period of the rotation tick, in seconds.
///
/// The platform timer feeding `Event::Tick` must use this cadence. It must also be coarser than
/// the time one activation (parameter, address and payload programming plus the start command)
/// takes to complete, or ticks will visibly stutter.
pub const TICK_PERIOD_SECS: u32 = 1;

/// Number of microseconds in one advertising interval unit.
const UNIT_MICROS: u32 = 625;

/// An advertising interval, stored in units of 0.625 ms.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AdvInterval(u32);

impl AdvInterval {
    /// Creates an [`AdvInterval`] from a raw number of 0.625 ms units.
    ///
    /// This is the value that ends up in the controller command unchanged.
    pub fn from_units(units: u32) -> Self {
        AdvInterval(units)
    }

    /// Creates an [`AdvInterval`] representing the given number of milliseconds.
    ///
    /// The value is rounded down to the next unit boundary.
    pub fn from_millis(millis: u32) -> Self {
        AdvInterval(millis * 1_000 / UNIT_MICROS)
    }

    /// Returns the raw number of 0.625 ms units.
    pub fn as_units(&self) -> u32 {
        self.0
    }

    /// Returns the interval in microseconds.
    pub fn as_micros(&self) -> u32 {
        self.0 * UNIT_MICROS
    }

    /// Returns the number of whole milliseconds in `self`.
    pub fn whole_millis(&self) -> u32 {
        self.as_micros() / 1_000
    }
}

impl fmt::Display for AdvInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let micros = self.as_micros();
        let (millis, submilli_micros) = (micros / 1_000, micros % 1_000);
        if submilli_micros == 0 {
            write!(f, "{}ms", millis)
        } else {
            write!(f, "{}.{:03}ms", millis, submilli_micros)
        }
    }
}

impl fmt::Debug for AdvInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}
