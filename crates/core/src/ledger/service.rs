//! Transaction service.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{Transaction, TransactionInput, TransactionRequest, TransactionStore};

/// Records, lists, edits and deletes a user's transactions.
pub struct LedgerService {
    store: Arc<dyn TransactionStore>,
}

impl LedgerService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Records a transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation variant if the request is incomplete or invalid.
    pub async fn add(
        &self,
        user_id: Uuid,
        request: TransactionRequest,
    ) -> Result<Transaction, LedgerError> {
        let input = TransactionInput::try_from(request)?;
        let tx = self.store.insert(user_id, &input).await?;

        info!(%user_id, transaction_id = %tx.id, category = %tx.category, "Transaction recorded");
        Ok(tx)
    }

    /// Lists the user's transactions, most recent first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.store.list(user_id).await?)
    }

    /// Replaces a transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or belongs to someone else.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: TransactionRequest,
    ) -> Result<Transaction, LedgerError> {
        let input = TransactionInput::try_from(request)?;
        self.store
            .update(user_id, id, &input)
            .await?
            .ok_or(LedgerError::NotFound(id))
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or belongs to someone else.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), LedgerError> {
        if self.store.delete(user_id, id).await? {
            info!(%user_id, transaction_id = %id, "Transaction deleted");
            Ok(())
        } else {
            Err(LedgerError::NotFound(id))
        }
    }
}
