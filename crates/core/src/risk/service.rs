//! Bridge between the questionnaire and the advisor.

use std::sync::Arc;

use mudra_shared::{Advisor, AdvisorError, AppError, Recommendations};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::UserStore;
use crate::store::StoreError;

/// Body of `POST /api/risk/submit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskSubmission {
    /// Questionnaire answers.
    pub answers: Option<Vec<i32>>,
}

/// Response of `POST /api/risk/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    /// Label returned by the advisor.
    pub risk_profile: String,
    /// Portfolio for that label.
    pub recommendations: Recommendations,
}

/// Risk submission errors.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Answers missing or empty.
    #[error("Valid answers are required.")]
    NoAnswers,

    /// The advisor failed.
    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RiskError> for AppError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::NoAnswers => Self::Validation(err.to_string()),
            RiskError::Advisor(_) => {
                Self::Upstream("Could not fetch recommendations from the advisor.".into())
            }
            RiskError::Store(e) => e.into(),
        }
    }
}

/// Runs a risk assessment through the advisor and records the outcome.
pub struct RiskService {
    users: Arc<dyn UserStore>,
    advisor: Arc<dyn Advisor>,
}

impl RiskService {
    /// Creates the service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, advisor: Arc<dyn Advisor>) -> Self {
        Self { users, advisor }
    }

    /// Classifies the answers, stores the label on the user, then fetches
    /// recommendations for it.
    ///
    /// The label is stored only once the advisor has produced it.
    ///
    /// # Errors
    ///
    /// - `NoAnswers` if the submission is empty
    /// - `Advisor` on any advisor failure
    pub async fn submit(
        &self,
        user_id: Uuid,
        submission: RiskSubmission,
    ) -> Result<RiskAssessment, RiskError> {
        let answers = submission
            .answers
            .filter(|a| !a.is_empty())
            .ok_or(RiskError::NoAnswers)?;

        let risk_profile = self
            .advisor
            .risk_profile(&answers)
            .await
            .inspect_err(|e| warn!(%user_id, error = %e, "Advisor risk-profile call failed"))?;

        self.users.set_risk_profile(user_id, &risk_profile).await?;

        let recommendations = self
            .advisor
            .recommendations(&risk_profile)
            .await
            .inspect_err(|e| warn!(%user_id, error = %e, "Advisor recommendations call failed"))?;

        info!(%user_id, %risk_profile, "Risk assessment completed");
        Ok(RiskAssessment {
            risk_profile,
            recommendations,
        })
    }
}
