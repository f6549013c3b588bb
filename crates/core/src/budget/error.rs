//! Budget error types.

use mudra_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::category::UnknownCategory;
use crate::money::AmountError;
use crate::period::PeriodError;
use crate::store::StoreError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// A field of the upsert body is missing.
    #[error("Category, limit amount, month, and year are required.")]
    MissingFields,

    /// The list query lacks month or year.
    #[error("Month and year are required.")]
    MissingPeriod,

    /// The update body lacks a limit.
    #[error("Limit amount is required.")]
    MissingLimit,

    /// Limit rejected.
    #[error("Limit amount {0}.")]
    InvalidLimit(AmountError),

    /// Month or year out of range.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    /// Category outside the fixed set.
    #[error("Invalid category: {0}.")]
    InvalidCategory(String),

    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UnknownCategory> for BudgetError {
    fn from(err: UnknownCategory) -> Self {
        Self::InvalidCategory(err.0)
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => {
                Self::NotFound("Budget not found or user not authorized.".into())
            }
            BudgetError::Store(e) => e.into(),
            other => Self::Validation(other.to_string()),
        }
    }
}
