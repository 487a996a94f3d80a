//! Pure conversions from raw slider readings to domain values.
//!
//! Every function here is stateless: the same raw reading always maps to the same value.

use crate::{ANALOG_MAX, Error, Result};

/// A closed output range `[low, high]` that a raw `0..=ANALOG_MAX` reading maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeMap {
    low: u32,
    high: u32,
}

impl RangeMap {
    /// Operands for the calculator.
    pub const OPERAND: Self = Self::new(1, 1000);
    /// Problem sizes for the sort race.
    pub const SORT_SIZE: Self = Self::new(10, 350);
    /// How many primes to find.
    pub const PRIME_COUNT: Self = Self::new(30_000, 100_000);

    #[must_use]
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub const fn low(self) -> u32 {
        self.low
    }

    #[must_use]
    pub const fn high(self) -> u32 {
        self.high
    }

    /// Linear integer map (the classic Arduino `map`), with the raw reading clamped first.
    ///
    /// Monotonic and bounded: `map(0) == low` and `map(ANALOG_MAX) == high`.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "validated ranges keep the product below u32::MAX"
    )]
    pub fn map(self, raw: u16) -> u32 {
        let raw = u32::from(raw.min(ANALOG_MAX));
        let span = self.high.saturating_sub(self.low);
        self.low + raw * span / u32::from(ANALOG_MAX)
    }

    /// Check that the range is non-empty and small enough to map without overflow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRange`] when `low >= high` or the span would overflow.
    pub fn validate(self, name: &'static str) -> Result<()> {
        let span = self.high.checked_sub(self.low).filter(|span| *span > 0);
        match span.and_then(|span| span.checked_mul(u32::from(ANALOG_MAX))) {
            Some(_) => Ok(()),
            None => Err(Error::EmptyRange { name }),
        }
    }
}

/// Split the raw range into `buckets` equal-width slices and return the slice index.
///
/// With four buckets the boundaries are 256, 512 and 768.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "bucket counts are tiny"
)]
pub fn quantize(raw: u16, buckets: usize) -> usize {
    let buckets = buckets.max(1);
    let raw = usize::from(raw.min(ANALOG_MAX));
    (raw * buckets / (usize::from(ANALOG_MAX) + 1)).min(buckets - 1)
}
