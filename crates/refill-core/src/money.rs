//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The old frontend kept prices as JS numbers:                           │
//! │    3 × 0.1 + 0.2 = 0.5000000000000001                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer centavos                                         │
//! │    Every price, subtotal, discount and total is an i64 count of the    │
//! │    smallest currency unit. Only the UI formats it as ₱12.50.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use refill_core::money::Money;
//!
//! let refill = Money::from_cents(2500); // ₱25.00
//! let line = refill.checked_mul_quantity(4).unwrap();
//! assert_eq!(line.cents(), 10000);
//! assert_eq!(line.to_string(), "₱100.00");
//! assert!(refill.checked_mul_quantity(i64::MAX).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// Signed so that intermediate differences (e.g. subtotal − discount) can be
/// represented and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity. `None` on overflow.
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display (`₱12.50`). The frontend does its own localized
/// formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
        let money = Money::from_cents(2550);
        assert_eq!(money.cents(), 2550);
        assert_eq!(money.major(), 25);
        assert_eq!(money.minor(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(2550).to_string(), "₱25.50");
        assert_eq!(Money::from_cents(500).to_string(), "₱5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-₱5.50");
        assert_eq!(Money::zero().to_string(), "₱0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert!((b - a).is_negative());
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(i64::MAX / 2);
        assert_eq!(Money::from_cents(1000).checked_mul_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(price.checked_mul_quantity(3), None);
        assert_eq!(price.checked_add(price), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(100).checked_sub(Money::from_cents(i64::MIN)), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 1000);

        let empty: Money = std::iter::empty().sum();
        assert!(empty.is_zero());
    }

    /// Three refills at ₱0.10 + a ₱0.20 cap is exactly ₱0.50, unlike f64.
    #[test]
    fn test_no_float_drift() {
        let line = Money::from_cents(10).checked_mul_quantity(3).unwrap() + Money::from_cents(20);
        assert_eq!(line.cents(), 50);
    }
}
