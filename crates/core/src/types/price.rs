//! Integer price representation.
//!
//! Catalog prices are whole Vietnamese dong. VND has no minor unit, so a
//! price is a plain integer and line totals never round.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An amount of money in whole dong.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero dong.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

/// Formats in the `vi-VN` currency style: `29.990.000 ₫`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{grouped} ₫")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::new(29_990_000).to_string(), "29.990.000 ₫");
        assert_eq!(Price::new(6_490_000).to_string(), "6.490.000 ₫");
        assert_eq!(Price::new(100).to_string(), "100 ₫");
        assert_eq!(Price::ZERO.to_string(), "0 ₫");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::new(-1_500).to_string(), "-1.500 ₫");
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::new(29_990_000).times(2), Price::new(59_980_000));
        assert_eq!(Price::new(5).times(0), Price::ZERO);
    }

    #[test]
    fn test_times_saturates() {
        assert_eq!(Price::new(i64::MAX).times(2), Price::new(i64::MAX));
    }

    #[test]
    fn test_sum() {
        let total: Price = [100, 200, 300].into_iter().map(Price::new).sum();
        assert_eq!(total, Price::new(600));
    }
}
