//! Budget domain types and the budget store seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;
use crate::period::MonthPeriod;
use crate::store::StoreResult;

/// A spending limit for one category in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    /// Budget id.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Category the limit applies to.
    pub category: Category,
    /// Monthly limit.
    pub limit_amount: Decimal,
    /// Month, 1-based.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/budgets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetRequest {
    /// Category name.
    pub category: Option<String>,
    /// Monthly limit.
    pub limit_amount: Option<Decimal>,
    /// Month, 1-based.
    pub month: Option<u32>,
    /// Year.
    pub year: Option<i32>,
}

/// Body of `PUT /api/budgets/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetLimitRequest {
    /// New monthly limit.
    pub limit_amount: Option<Decimal>,
}

/// Query of `GET /api/budgets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetPeriodQuery {
    /// Month, 1-based.
    pub month: Option<u32>,
    /// Year.
    pub year: Option<i32>,
}

/// A validated budget upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetInput {
    /// Category the limit applies to.
    pub category: Category,
    /// Positive limit, rounded to cents.
    pub limit_amount: Decimal,
    /// Month the limit applies to.
    pub period: MonthPeriod,
}

/// A budget and what was spent against it, as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetSpending {
    /// The budget row.
    pub budget: Budget,
    /// Sum of matching transactions in the budget's month; zero if none.
    pub total_spent: Decimal,
}

/// A budget with its derived spend figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    /// Budget id.
    pub id: Uuid,
    /// Category.
    pub category: Category,
    /// Monthly limit.
    pub limit_amount: Decimal,
    /// Month, 1-based.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Spent so far this month.
    pub total_spent: Decimal,
    /// `limit_amount - total_spent`; negative when over budget.
    pub remaining: Decimal,
    /// `total_spent / limit_amount * 100`, two decimals.
    pub utilization_percent: Decimal,
}

/// Persistence for budgets. Every call is scoped to `user_id`.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Inserts the budget, or replaces the limit of the existing one for the
    /// same category and month.
    async fn upsert(&self, user_id: Uuid, input: &BudgetInput) -> StoreResult<Budget>;

    /// Budgets for `period` with their month's spend, ordered by category.
    async fn with_spending(
        &self,
        user_id: Uuid,
        period: MonthPeriod,
    ) -> StoreResult<Vec<BudgetSpending>>;

    /// Changes the limit; `None` if the budget is not the user's.
    async fn update_limit(
        &self,
        user_id: Uuid,
        id: Uuid,
        limit_amount: Decimal,
    ) -> StoreResult<Option<Budget>>;

    /// Deletes a budget; `false` if it is not the user's.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;
}
