//! Time representation for the scrub timeline.
//!
//! Instants are rational seconds so repeated conversions between pixels and
//! time do not drift. Values built from floats are quantised to microseconds.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Denominator used when converting from floating-point seconds.
const MICROS_PER_SECOND: i64 = 1_000_000;

/// A point in (or a length of) an asset's timeline, in rational seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    value: Rational64,
}

impl RationalTime {
    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Create a time of `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Whole seconds.
    #[inline]
    pub fn from_secs(seconds: i64) -> Self {
        Self::new(seconds, 1)
    }

    /// Milliseconds.
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self::new(millis, 1000)
    }

    /// Create a time from floating-point seconds, rounded to the microsecond.
    /// Non-finite input yields zero.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        if !seconds.is_finite() {
            return Self::ZERO;
        }
        Self::new(
            (seconds * MICROS_PER_SECOND as f64).round() as i64,
            MICROS_PER_SECOND,
        )
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Scale this time by a floating-point factor.
    pub fn scale(self, factor: f64) -> Self {
        Self::from_seconds_f64(self.to_seconds_f64() * factor)
    }

    /// Fraction `self / whole`, or `None` when `whole` is zero.
    pub fn ratio_of(self, whole: Self) -> Option<f64> {
        if whole.is_zero() {
            return None;
        }
        let ratio = self.value / whole.value;
        Some(*ratio.numer() as f64 / *ratio.denom() as f64)
    }

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Check if this time is below zero.
    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }

    /// Restrict to `[min, max]`.
    pub fn clamp_to(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}
