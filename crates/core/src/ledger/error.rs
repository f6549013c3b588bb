//! Ledger error types.

use mudra_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::category::UnknownCategory;
use crate::money::AmountError;
use crate::store::StoreError;

/// Transaction errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount, category or date missing.
    #[error("Amount, category, and date are required.")]
    MissingFields,

    /// Amount rejected.
    #[error("Amount {0}.")]
    InvalidAmount(AmountError),

    /// Category outside the fixed set.
    #[error("Invalid category: {0}.")]
    InvalidCategory(String),

    /// No such transaction for this user.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UnknownCategory> for LedgerError {
    fn from(err: UnknownCategory) -> Self {
        Self::InvalidCategory(err.0)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MissingFields
            | LedgerError::InvalidAmount(_)
            | LedgerError::InvalidCategory(_) => Self::Validation(err.to_string()),
            LedgerError::NotFound(_) => {
                Self::NotFound("Transaction not found or user not authorized.".into())
            }
            LedgerError::Store(e) => e.into(),
        }
    }
}
