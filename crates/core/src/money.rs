//! Monetary arithmetic.
//!
//! Amounts are stored and serialized as `f64` rounded to two decimal
//! places. Every sum or percentage is computed in [`Decimal`] and converted
//! back with [`to_f64`], so totals built from the same rows always agree.

use rust_decimal::prelude::*;

/// Number of decimal places kept for every stored amount.
const DECIMAL_PLACES: u32 = 2;

/// Upper bound accepted for a single price or payment.
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal for calculation.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places (half away from zero).
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an amount to 2 decimal places.
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// `percent`% of `amount`, rounded.
pub fn percent_of(amount: f64, percent: u32) -> f64 {
    to_f64(to_decimal(amount) * Decimal::from(percent) / Decimal::ONE_HUNDRED)
}

/// Sum amounts exactly, then round once.
pub fn sum<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).sum())
}
