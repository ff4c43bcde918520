//! Money conversion helpers
//!
//! Client-facing amounts are decimal dollars; the payment processor charges
//! in minor units (cents).

/// Convert a dollar amount to minor units, rounding to the nearest cent.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
