//! Persistence seam shared by every service.
//!
//! Each module declares the store trait it needs (`UserStore`,
//! `TransactionStore`, ...). The database crate implements them on
//! PostgreSQL; the `testing` feature implements them in memory.

use std::sync::Arc;

use mudra_shared::AppError;
use thiserror::Error;

use crate::auth::UserStore;
use crate::budget::BudgetStore;
use crate::dashboard::SummaryStore;
use crate::goals::GoalStore;
use crate::ledger::TransactionStore;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A computed value would not fit its column.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => Self::Conflict("Resource already exists.".into()),
            StoreError::OutOfRange(_) => {
                Self::Validation("Value exceeds the supported range.".into())
            }
            StoreError::Backend(msg) => Self::Database(msg),
        }
    }
}

/// Handles to every store, as injected into the services.
#[derive(Clone)]
pub struct Stores {
    /// Credential store.
    pub users: Arc<dyn UserStore>,
    /// Transaction ledger.
    pub transactions: Arc<dyn TransactionStore>,
    /// Monthly category budgets.
    pub budgets: Arc<dyn BudgetStore>,
    /// Savings goals.
    pub goals: Arc<dyn GoalStore>,
    /// Read-only dashboard aggregations.
    pub summaries: Arc<dyn SummaryStore>,
}
