//! Money in whole South African rand.
//!
//! The plans API prices everything in integer rand (no cents on the wire),
//! so `Money` wraps a `u64` amount rather than a decimal type. Arithmetic
//! that could overflow is exposed through checked operations; display
//! formatting inserts thousands separators (`R15,000`).

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An amount of money in whole rand (ZAR).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero rand.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole rand.
    #[must_use]
    pub const fn from_rand(amount: u64) -> Self {
        Self(amount)
    }

    /// The amount in whole rand.
    #[must_use]
    pub const fn as_rand(&self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    ///
    /// Cart totals stay far below the saturation point for any realistic
    /// catalog, so saturation is preferable to a panicking overflow.
    #[must_use]
    pub const fn saturating_mul(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Whether this is exactly zero rand.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Money {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Money {
    /// Formats as `R` followed by the comma-grouped amount, e.g. `R15,000`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "R{grouped}")
    }
}
