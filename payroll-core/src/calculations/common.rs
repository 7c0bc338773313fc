//! Common utility functions for payroll calculations.
//!
//! This module provides shared functionality used across the pipeline, the
//! solver and the words renderer, including rounding and input guards.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::PayrollError;

/// Largest amount the engine accepts. Keeps every intermediate product well
/// inside the 28 significant digits of [`Decimal`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x38D7E, 0, false, 0);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole currency unit, halves away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_to_whole;
///
/// assert_eq!(round_to_whole(dec!(1000.49)), dec!(1000));
/// assert_eq!(round_to_whole(dec!(1000.50)), dec!(1001));
/// ```
pub fn round_to_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}


/// Rejects negative amounts and amounts above [`MAX_AMOUNT`].
pub fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, PayrollError> {
    if value < Decimal::ZERO || value > MAX_AMOUNT {
        return Err(PayrollError::invalid(field, value));
    }
    Ok(value)
}

/// Rejects zero, negative amounts and amounts above [`MAX_AMOUNT`].
pub fn ensure_positive(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, PayrollError> {
    if value <= Decimal::ZERO || value > MAX_AMOUNT {
        return Err(PayrollError::invalid(field, value));
    }
    Ok(value)
}
