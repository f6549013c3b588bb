//! Goal types and the goal store seam.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreResult;

/// Longest accepted goal name, in characters.
pub const MAX_GOAL_NAME_LEN: usize = 255;

/// A savings target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
    /// Goal id.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Display name.
    pub goal_name: String,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Saved so far; starts at zero and may pass the target.
    pub current_amount: Decimal,
    /// Optional deadline.
    pub target_date: Option<NaiveDate>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Whether contributions have reached the target.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

/// Body of `POST /api/goals`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalRequest {
    /// Display name.
    pub goal_name: Option<String>,
    /// Amount to reach.
    pub target_amount: Option<Decimal>,
    /// Optional deadline, `YYYY-MM-DD`. Blank means no deadline.
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub target_date: Option<NaiveDate>,
}

/// Reads an optional `YYYY-MM-DD` date; an empty or blank string is `None`.
///
/// An unset HTML date input submits `""`.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| de::Error::custom("target_date must be a YYYY-MM-DD date"))
}

/// Body of `PUT /api/goals/{id}/contribute`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContributionRequest {
    /// Amount to add.
    pub amount: Option<Decimal>,
}

/// A validated goal creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalInput {
    /// Trimmed name.
    pub goal_name: String,
    /// Positive target, rounded to cents.
    pub target_amount: Decimal,
    /// Optional deadline.
    pub target_date: Option<NaiveDate>,
}

/// Persistence for goals. Every call is scoped to `user_id`.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Inserts a goal with `current_amount = 0`.
    async fn insert(&self, user_id: Uuid, input: &GoalInput) -> StoreResult<Goal>;

    /// Lists goals by deadline (none last), then newest first.
    async fn list(&self, user_id: Uuid) -> StoreResult<Vec<Goal>>;

    /// Adds `amount` to `current_amount` in one atomic step; `None` if the
    /// goal is not the user's, `OutOfRange` if the sum would exceed
    /// [`MAX_AMOUNT`](crate::money::MAX_AMOUNT).
    async fn contribute(
        &self,
        user_id: Uuid,
        id: Uuid,
        amount: Decimal,
    ) -> StoreResult<Option<Goal>>;

    /// Deletes a goal; `false` if it is not the user's.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;
}
