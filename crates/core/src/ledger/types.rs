//! Transaction types and the ledger store seam.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use crate::category::Category;
use crate::money::positive_amount;
use crate::store::StoreResult;

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Transaction id.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Positive amount, two decimals.
    pub amount: Decimal,
    /// Spending category.
    pub category: Category,
    /// Free-form note.
    pub description: Option<String>,
    /// Day the money was spent.
    pub transaction_date: NaiveDate,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/transactions` and `PUT /api/transactions/{id}`.
///
/// Every field is optional so a missing one is reported as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionRequest {
    /// Amount spent.
    pub amount: Option<Decimal>,
    /// Category name.
    pub category: Option<String>,
    /// Optional note.
    pub description: Option<String>,
    /// `YYYY-MM-DD`.
    pub transaction_date: Option<NaiveDate>,
}

/// A validated transaction write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    /// Positive amount, rounded to cents.
    pub amount: Decimal,
    /// Parsed category.
    pub category: Category,
    /// Trimmed note, `None` when blank.
    pub description: Option<String>,
    /// Day the money was spent.
    pub transaction_date: NaiveDate,
}

impl TryFrom<TransactionRequest> for TransactionInput {
    type Error = LedgerError;

    fn try_from(req: TransactionRequest) -> Result<Self, Self::Error> {
        let category = req.category.filter(|c| !c.trim().is_empty());
        let (Some(amount), Some(category), Some(transaction_date)) =
            (req.amount, category, req.transaction_date)
        else {
            return Err(LedgerError::MissingFields);
        };

        let amount = positive_amount(amount).map_err(LedgerError::InvalidAmount)?;
        let category = category.parse::<Category>()?;
        let description = req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            amount,
            category,
            description,
            transaction_date,
        })
    }
}

/// Persistence for transactions. Every call is scoped to `user_id`.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a transaction.
    async fn insert(&self, user_id: Uuid, input: &TransactionInput) -> StoreResult<Transaction>;

    /// Lists the user's transactions, newest date first, then newest created.
    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>>;

    /// Replaces every field of a transaction; `None` if it is not the user's.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &TransactionInput,
    ) -> StoreResult<Option<Transaction>>;

    /// Deletes a transaction; `false` if it is not the user's.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;
}
