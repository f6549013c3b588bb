//! Monetary amount rules shared by transactions, budgets and goals.
//!
//! Amounts are stored as `NUMERIC(14, 2)`.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Digits kept after the decimal point.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(14, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, AMOUNT_SCALE);

/// Why an amount was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Zero or negative after rounding to cents.
    #[error("must be a positive number")]
    NotPositive,

    /// Does not fit the column.
    #[error("exceeds the maximum of 999999999999.99")]
    TooLarge,
}

/// Rounds to cents (half away from zero, as PostgreSQL does) and checks the
/// amount is positive and storable.
///
/// # Errors
///
/// Returns `AmountError` if the rounded amount is not in `(0, MAX_AMOUNT]`.
pub fn positive_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    let rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    if rounded > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    Ok(rounded)
}
