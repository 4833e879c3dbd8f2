//! Money helpers
//!
//! Prices are stored as `f64`; every sum goes through `Decimal` so revenue
//! totals do not drift.

use rust_decimal::prelude::*;

/// Decimal places for stored/returned amounts
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `total / count`, or 0 when `count == 0`
pub fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    to_f64(to_decimal(total) / Decimal::from(count))
}
