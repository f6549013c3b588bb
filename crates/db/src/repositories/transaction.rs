//! Transaction repository.

use async_trait::async_trait;
use chrono::Utc;
use mudra_core::StoreResult;
use mudra_core::ledger::{Transaction, TransactionInput, TransactionStore};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::transactions;
use crate::error::{corrupt_row, store_error};

/// Expenses stored in the `transactions` table.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_transaction(model: transactions::Model) -> StoreResult<Transaction> {
    let category = model
        .category
        .parse()
        .map_err(|e| corrupt_row("transactions", e))?;

    Ok(Transaction {
        id: model.id,
        user_id: model.user_id,
        amount: model.amount,
        category,
        description: model.description,
        transaction_date: model.transaction_date,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn insert(&self, user_id: Uuid, input: &TransactionInput) -> StoreResult<Transaction> {
        let model = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            amount: Set(input.amount),
            category: Set(input.category.as_str().to_string()),
            description: Set(input.description.clone()),
            transaction_date: Set(input.transaction_date),
            created_at: Set(Utc::now().into()),
        };

        let saved = model.insert(&self.db).await.map_err(store_error)?;
        to_transaction(saved)
    }

    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(to_transaction)
            .collect()
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: &TransactionInput,
    ) -> StoreResult<Option<Transaction>> {
        let rows = transactions::Entity::update_many()
            .col_expr(transactions::Column::Amount, Expr::value(input.amount))
            .col_expr(
                transactions::Column::Category,
                Expr::value(input.category.as_str()),
            )
            .col_expr(
                transactions::Column::Description,
                Expr::value(input.description.clone()),
            )
            .col_expr(
                transactions::Column::TransactionDate,
                Expr::value(input.transaction_date),
            )
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        rows.into_iter().next().map(to_transaction).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }
}
