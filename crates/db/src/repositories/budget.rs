//! Budget repository.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use mudra_core::budget::{Budget, BudgetInput, BudgetSpending, BudgetStore};
use mudra_core::{MonthPeriod, StoreResult};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, QueryFilter, Set,
    Statement,
};
use uuid::Uuid;

use crate::entities::budgets;
use crate::error::{corrupt_row, store_error};

/// Monthly limits stored in the `budgets` table.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Sums each budget's category over its month; budgets with no spend get 0.
const BUDGETS_WITH_SPENDING_SQL: &str = r"
SELECT b.id, b.user_id, b.category, b.limit_amount, b.month, b.year, b.created_at,
       COALESCE(SUM(t.amount), 0) AS total_spent
FROM budgets b
LEFT JOIN transactions t
       ON t.user_id = b.user_id
      AND t.category = b.category
      AND t.transaction_date >= $4
      AND t.transaction_date < $5
WHERE b.user_id = $1 AND b.month = $2 AND b.year = $3
GROUP BY b.id
ORDER BY b.category
";

#[derive(Debug, FromQueryResult)]
struct BudgetSpendingRow {
    id: Uuid,
    user_id: Uuid,
    category: String,
    limit_amount: Decimal,
    month: i16,
    year: i32,
    created_at: DateTime<FixedOffset>,
    total_spent: Decimal,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn month_column(period: MonthPeriod) -> i16 {
    // Always 1..=12.
    period.month() as i16
}

fn to_budget(model: budgets::Model) -> StoreResult<Budget> {
    let category = model
        .category
        .parse()
        .map_err(|e| corrupt_row("budgets", e))?;
    let month = u32::try_from(model.month).map_err(|e| corrupt_row("budgets", e))?;

    Ok(Budget {
        id: model.id,
        user_id: model.user_id,
        category,
        limit_amount: model.limit_amount,
        month,
        year: model.year,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

impl BudgetSpendingRow {
    fn into_domain(self) -> StoreResult<BudgetSpending> {
        let budget = to_budget(budgets::Model {
            id: self.id,
            user_id: self.user_id,
            category: self.category,
            limit_amount: self.limit_amount,
            month: self.month,
            year: self.year,
            created_at: self.created_at,
        })?;
        Ok(BudgetSpending {
            budget,
            total_spent: self.total_spent,
        })
    }
}

#[async_trait]
impl BudgetStore for BudgetRepository {
    async fn upsert(&self, user_id: Uuid, input: &BudgetInput) -> StoreResult<Budget> {
        let model = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category: Set(input.category.as_str().to_string()),
            limit_amount: Set(input.limit_amount),
            month: Set(month_column(input.period)),
            year: Set(input.period.year()),
            created_at: Set(Utc::now().into()),
        };

        let saved = budgets::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    budgets::Column::UserId,
                    budgets::Column::Category,
                    budgets::Column::Month,
                    budgets::Column::Year,
                ])
                .update_column(budgets::Column::LimitAmount)
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        to_budget(saved)
    }

    async fn with_spending(
        &self,
        user_id: Uuid,
        period: MonthPeriod,
    ) -> StoreResult<Vec<BudgetSpending>> {
        let (from, to) = period.date_range();
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            BUDGETS_WITH_SPENDING_SQL,
            [
                user_id.into(),
                month_column(period).into(),
                period.year().into(),
                from.into(),
                to.into(),
            ],
        );

        BudgetSpendingRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(BudgetSpendingRow::into_domain)
            .collect()
    }

    async fn update_limit(
        &self,
        user_id: Uuid,
        id: Uuid,
        limit_amount: Decimal,
    ) -> StoreResult<Option<Budget>> {
        let rows = budgets::Entity::update_many()
            .col_expr(budgets::Column::LimitAmount, Expr::value(limit_amount))
            .filter(budgets::Column::Id.eq(id))
            .filter(budgets::Column::UserId.eq(user_id))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        rows.into_iter().next().map(to_budget).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id))
            .filter(budgets::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }
}
