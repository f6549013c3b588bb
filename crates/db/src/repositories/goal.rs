//! Goal repository.

use async_trait::async_trait;
use chrono::Utc;
use mudra_core::money::MAX_AMOUNT;
use mudra_core::{StoreError, StoreResult};
use mudra_core::goals::{Goal, GoalInput, GoalStore};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, NullOrdering};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::goals;
use crate::error::store_error;

/// Savings goals stored in the `goals` table.
#[derive(Debug, Clone)]
pub struct GoalRepository {
    db: DatabaseConnection,
}

impl GoalRepository {
    /// Creates a new goal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_goal(model: goals::Model) -> Goal {
    Goal {
        id: model.id,
        user_id: model.user_id,
        goal_name: model.goal_name,
        target_amount: model.target_amount,
        current_amount: model.current_amount,
        target_date: model.target_date,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl GoalStore for GoalRepository {
    async fn insert(&self, user_id: Uuid, input: &GoalInput) -> StoreResult<Goal> {
        let model = goals::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            goal_name: Set(input.goal_name.clone()),
            target_amount: Set(input.target_amount),
            current_amount: Set(Decimal::ZERO),
            target_date: Set(input.target_date),
            created_at: Set(Utc::now().into()),
        };

        model.insert(&self.db).await.map(to_goal).map_err(store_error)
    }

    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<Goal>> {
        let rows = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_with_nulls(goals::Column::TargetDate, Order::Asc, NullOrdering::Last)
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(to_goal).collect())
    }

    async fn contribute(
        &self,
        user_id: Uuid,
        id: Uuid,
        amount: Decimal,
    ) -> StoreResult<Option<Goal>> {
        // Single UPDATE so concurrent contributions never overwrite each other.
        let rows = goals::Entity::update_many()
            .col_expr(
                goals::Column::CurrentAmount,
                Expr::col(goals::Column::CurrentAmount).add(amount),
            )
            .filter(goals::Column::Id.eq(id))
            .filter(goals::Column::UserId.eq(user_id))
            .filter(goals::Column::CurrentAmount.lte(MAX_AMOUNT - amount))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        if let Some(row) = rows.into_iter().next() {
            return Ok(Some(to_goal(row)));
        }

        // No row updated: either the goal is missing or the balance cap held it back.
        let exists = goals::Entity::find()
            .filter(goals::Column::Id.eq(id))
            .filter(goals::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .is_some();
        if exists {
            return Err(StoreError::OutOfRange("goals.current_amount".into()));
        }
        Ok(None)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = goals::Entity::delete_many()
            .filter(goals::Column::Id.eq(id))
            .filter(goals::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }
}
