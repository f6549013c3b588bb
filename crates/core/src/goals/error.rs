//! Goal error types.

use mudra_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::money::AmountError;
use crate::store::StoreError;

/// Goal errors.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Name or target missing.
    #[error("Goal name and target amount are required.")]
    MissingFields,

    /// Name longer than allowed.
    #[error("Goal name must be at most {0} characters.")]
    NameTooLong(usize),

    /// Target rejected.
    #[error("Target amount {0}.")]
    InvalidTarget(AmountError),

    /// Contribution missing.
    #[error("Contribution amount is required.")]
    MissingAmount,

    /// Contribution rejected.
    #[error("Contribution amount {0}.")]
    InvalidContribution(AmountError),

    /// The saved balance would exceed the largest storable amount.
    #[error("Contribution would exceed the maximum goal balance.")]
    BalanceTooLarge,

    /// No such goal for this user.
    #[error("Goal not found: {0}")]
    NotFound(Uuid),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::NotFound(_) => Self::NotFound("Goal not found or user not authorized.".into()),
            GoalError::Store(e) => e.into(),
            other => Self::Validation(other.to_string()),
        }
    }
}
