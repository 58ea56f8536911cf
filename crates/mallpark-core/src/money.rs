//! # Money Module
//!
//! Provides the `Money` type for parking fees and rates.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Per-second proration with f64:                                         │
//! │    20.00/h × 1s = 0.005555555555555556  → drift over long sessions      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    2000 cents/h × 1s = 2000 / 3600 → exact rational, rounded ONCE       │
//! │    at the end of the session, never per second                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mallpark_core::money::Money;
//!
//! let flat = Money::from_cents(4000);       // 40.00
//! let hourly = Money::from_cents(2000);     // 20.00 per hour
//!
//! // 90 minutes of continuous parking
//! let overage = hourly.prorate_hourly(5400);
//! assert_eq!((flat + overage).cents(), 7000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Seconds in one billing hour.
pub const SECONDS_PER_HOUR: i64 = 3600;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos/cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Matches the storage type used by collaborators
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as a bare integer**: `4000`, never `40.0`
///
/// ## Where Money is Used
/// ```text
/// MallConfig.flat_rate_cents ─────────┐
///                                     ├──► fee::compute_charge ──► ExitReceipt.charge
/// SlotSizeClass.continuous_rate_cents ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mallpark_core::money::Money;
    ///
    /// let rate = Money::from_cents(6000); // 60.00
    /// assert_eq!(rate.cents(), 6000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Treats `self` as an hourly rate and returns the charge for `seconds`.
    ///
    /// ## Rounding
    /// The exact amount is `rate × seconds / 3600`. It is computed in i128
    /// and rounded half away from zero to the nearest cent, so the only
    /// rounding step happens here, once per session. Results beyond the
    /// `i64` range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use mallpark_core::money::Money;
    ///
    /// let rate = Money::from_cents(2000); // 20.00/h
    /// assert_eq!(rate.prorate_hourly(3600).cents(), 2000);
    /// assert_eq!(rate.prorate_hourly(1800).cents(), 1000);
    /// // 1 second = 0.5555... cents → rounds to 1 cent
    /// assert_eq!(rate.prorate_hourly(1).cents(), 1);
    /// ```
    pub fn prorate_hourly(&self, seconds: i64) -> Money {
        let numerator = self.0 as i128 * seconds as i128;
        let denominator = SECONDS_PER_HOUR as i128;
        let half = denominator / 2;
        let rounded = if numerator >= 0 {
            (numerator + half) / denominator
        } else {
            (numerator - half) / denominator
        };
        let cents = i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX });
        Money::from_cents(cents)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `major.minor`, e.g. `40.00`.
///
/// Currency symbols are a presentation concern of the collaborator.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturates at the `i64` bounds instead of overflowing.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(4050);
        assert_eq!(money.cents(), 4050);
        assert_eq!(money.major(), 40);
        assert_eq!(money.minor_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(4000).to_string(), "40.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(4000);
        let b = Money::from_cents(2000);

        assert_eq!((a + b).cents(), 6000);
    }

    #[test]
    fn test_add_saturates() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!(max.prorate_hourly(i64::MAX).cents(), i64::MAX);
    }

    #[test]
    fn test_prorate_whole_hours() {
        let rate = Money::from_cents(10000); // 100.00/h
        assert_eq!(rate.prorate_hourly(0).cents(), 0);
        assert_eq!(rate.prorate_hourly(3600).cents(), 10000);
        assert_eq!(rate.prorate_hourly(7200).cents(), 20000);
    }

    #[test]
    fn test_prorate_rounds_half_up() {
        // 2000 × 9 / 3600 = 5.0 exactly
        assert_eq!(Money::from_cents(2000).prorate_hourly(9).cents(), 5);
        // 60 × 30 / 3600 = 0.5 → 1
        assert_eq!(Money::from_cents(60).prorate_hourly(30).cents(), 1);
        // 60 × 29 / 3600 = 0.483 → 0
        assert_eq!(Money::from_cents(60).prorate_hourly(29).cents(), 0);
    }

    /// A month of parking must not drift: the result equals the exact
    /// rational value rounded once.
    #[test]
    fn test_prorate_long_session_is_exact() {
        let rate = Money::from_cents(2000);
        let thirty_days = 30 * 24 * SECONDS_PER_HOUR;
        assert_eq!(rate.prorate_hourly(thirty_days).cents(), 2000 * 30 * 24);

        // one extra second adds 0.555... cents, rounded once
        assert_eq!(
            rate.prorate_hourly(thirty_days + 1).cents(),
            2000 * 30 * 24 + 1
        );
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Money::from_cents(4000)).unwrap();
        assert_eq!(json, "4000");
    }
}
