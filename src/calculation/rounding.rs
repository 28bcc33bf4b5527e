//! Decimal rounding used by grade computation and aggregation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds `value` to `dp` decimal places, halves rounding up.
///
/// Grades and averages are never negative, so rounding midpoints away from
/// zero is the same as rounding them up.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::round_half_up;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("7.25").unwrap();
/// assert_eq!(round_half_up(value, 1), Decimal::from_str("7.3").unwrap());
///
/// let value = Decimal::from_str("2.857142").unwrap();
/// assert_eq!(round_half_up(value, 2), Decimal::from_str("2.86").unwrap());
/// ```
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
