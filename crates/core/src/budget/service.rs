//! Budget service: upserts, spend tracking and limit edits.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;
use uuid::Uuid;

use super::error::BudgetError;
use super::types::{
    Budget, BudgetInput, BudgetLimitRequest, BudgetPeriodQuery, BudgetRequest, BudgetSpending,
    BudgetStatus, BudgetStore,
};
use crate::category::Category;
use crate::money::positive_amount;
use crate::period::MonthPeriod;

/// Budget service for business logic.
pub struct BudgetService {
    store: Arc<dyn BudgetStore>,
}

impl BudgetService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn BudgetStore>) -> Self {
        Self { store }
    }

    /// Derives `remaining` and `utilization_percent` for a budget.
    ///
    /// Utilization is zero when the limit is zero.
    #[must_use]
    pub fn status(spending: BudgetSpending) -> BudgetStatus {
        let BudgetSpending {
            budget,
            total_spent,
        } = spending;

        let utilization_percent = if budget.limit_amount.is_zero() {
            Decimal::ZERO
        } else {
            (total_spent / budget.limit_amount * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        BudgetStatus {
            id: budget.id,
            category: budget.category,
            limit_amount: budget.limit_amount,
            month: budget.month,
            year: budget.year,
            total_spent,
            remaining: budget.limit_amount - total_spent,
            utilization_percent,
        }
    }

    /// Sets the limit for a category and month, creating the budget if needed.
    ///
    /// # Errors
    ///
    /// Returns a validation variant if the body is incomplete or invalid.
    pub async fn set(&self, user_id: Uuid, request: BudgetRequest) -> Result<Budget, BudgetError> {
        let category = request.category.filter(|c| !c.trim().is_empty());
        let (Some(category), Some(limit_amount), Some(month), Some(year)) =
            (category, request.limit_amount, request.month, request.year)
        else {
            return Err(BudgetError::MissingFields);
        };

        let input = BudgetInput {
            category: category.parse::<Category>()?,
            limit_amount: positive_amount(limit_amount).map_err(BudgetError::InvalidLimit)?,
            period: MonthPeriod::new(year, month)?,
        };

        let budget = self.store.upsert(user_id, &input).await?;
        info!(
            %user_id,
            budget_id = %budget.id,
            category = %budget.category,
            period = %input.period,
            "Budget set"
        );
        Ok(budget)
    }

    /// Lists the month's budgets with spend figures, ordered by category.
    ///
    /// # Errors
    ///
    /// Returns `MissingPeriod` or `InvalidPeriod` for a bad query.
    pub async fn with_spending(
        &self,
        user_id: Uuid,
        query: BudgetPeriodQuery,
    ) -> Result<Vec<BudgetStatus>, BudgetError> {
        let (Some(month), Some(year)) = (query.month, query.year) else {
            return Err(BudgetError::MissingPeriod);
        };
        let period = MonthPeriod::new(year, month)?;

        let rows = self.store.with_spending(user_id, period).await?;
        Ok(rows.into_iter().map(Self::status).collect())
    }

    /// Changes only the limit of an existing budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget is not the user's.
    pub async fn update_limit(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: BudgetLimitRequest,
    ) -> Result<Budget, BudgetError> {
        let limit_amount = request.limit_amount.ok_or(BudgetError::MissingLimit)?;
        let limit_amount = positive_amount(limit_amount).map_err(BudgetError::InvalidLimit)?;

        self.store
            .update_limit(user_id, id, limit_amount)
            .await?
            .ok_or(BudgetError::NotFound(id))
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the budget is not the user's.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), BudgetError> {
        if self.store.delete(user_id, id).await? {
            info!(%user_id, budget_id = %id, "Budget deleted");
            Ok(())
        } else {
            Err(BudgetError::NotFound(id))
        }
    }
}
