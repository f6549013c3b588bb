//! Goal service.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::GoalError;
use super::types::{
    ContributionRequest, Goal, GoalInput, GoalRequest, GoalStore, MAX_GOAL_NAME_LEN,
};
use crate::money::positive_amount;
use crate::store::StoreError;

/// Creates goals and tracks contributions toward them.
pub struct GoalService {
    store: Arc<dyn GoalStore>,
}

impl GoalService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn GoalStore>) -> Self {
        Self { store }
    }

    /// Creates a goal with nothing saved yet.
    ///
    /// # Errors
    ///
    /// Returns a validation variant for a missing name or a bad target.
    pub async fn create(&self, user_id: Uuid, request: GoalRequest) -> Result<Goal, GoalError> {
        let name = request
            .goal_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let (Some(goal_name), Some(target_amount)) = (name, request.target_amount) else {
            return Err(GoalError::MissingFields);
        };
        if goal_name.chars().count() > MAX_GOAL_NAME_LEN {
            return Err(GoalError::NameTooLong(MAX_GOAL_NAME_LEN));
        }

        let input = GoalInput {
            goal_name,
            target_amount: positive_amount(target_amount).map_err(GoalError::InvalidTarget)?,
            target_date: request.target_date,
        };

        let goal = self.store.insert(user_id, &input).await?;
        info!(%user_id, goal_id = %goal.id, "Goal created");
        Ok(goal)
    }

    /// Lists goals, soonest deadline first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Goal>, GoalError> {
        Ok(self.store.list(user_id).await?)
    }

    /// Adds a positive amount to a goal's savings.
    ///
    /// Concurrent contributions are all applied.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the goal is not the user's
    /// - `BalanceTooLarge` if the new balance would not fit `NUMERIC(14,2)`
    pub async fn contribute(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: ContributionRequest,
    ) -> Result<Goal, GoalError> {
        let amount = request.amount.ok_or(GoalError::MissingAmount)?;
        let amount = positive_amount(amount).map_err(GoalError::InvalidContribution)?;

        let goal = match self.store.contribute(user_id, id, amount).await {
            Ok(Some(goal)) => goal,
            Ok(None) => return Err(GoalError::NotFound(id)),
            Err(StoreError::OutOfRange(_)) => return Err(GoalError::BalanceTooLarge),
            Err(e) => return Err(e.into()),
        };

        info!(%user_id, goal_id = %id, %amount, reached = goal.is_reached(), "Goal contribution");
        Ok(goal)
    }

    /// Deletes a goal.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the goal is not the user's.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), GoalError> {
        if self.store.delete(user_id, id).await? {
            info!(%user_id, goal_id = %id, "Goal deleted");
            Ok(())
        } else {
            Err(GoalError::NotFound(id))
        }
    }
}
