//! Client for the recommendation ("advisor") service.
//!
//! The advisor exposes two endpoints:
//! - `POST /api/risk-profile {answers}` → `{risk_profile}`
//! - `POST /api/recommendations {risk_profile}` → [`Recommendations`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AdvisorConfig;

/// Errors talking to the advisor.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The request did not complete within the configured timeout.
    #[error("advisor request timed out")]
    Timeout,

    /// Transport-level failure.
    #[error("advisor request failed: {0}")]
    Request(String),

    /// The advisor answered with a non-success status.
    #[error("advisor returned status {0}")]
    Status(u16),

    /// The advisor's response body could not be decoded.
    #[error("advisor response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Body of `POST /api/risk-profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfileRequest {
    /// Questionnaire answers, forwarded untouched.
    pub answers: Vec<i32>,
}

/// Response of `POST /api/risk-profile`, and body of `POST /api/recommendations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfileBody {
    /// Coarse profile label, e.g. `Moderate`.
    pub risk_profile: String,
}

/// One line of a suggested portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    /// Instrument name.
    pub instrument: String,
    /// Share of the portfolio, e.g. `40%`.
    pub allocation: String,
    /// Short explanation.
    pub details: String,
}

/// Portfolio recommendation for a risk profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    /// What the profile aims for.
    pub description: String,
    /// Suggested allocation.
    pub portfolio: Vec<PortfolioItem>,
}

/// The recommendation collaborator.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Derives a risk-profile label from questionnaire answers.
    async fn risk_profile(&self, answers: &[i32]) -> Result<String, AdvisorError>;

    /// Fetches the portfolio recommendation for a profile label.
    async fn recommendations(&self, risk_profile: &str) -> Result<Recommendations, AdvisorError>;
}

/// HTTP implementation of [`Advisor`].
#[derive(Debug, Clone)]
pub struct AdvisorClient {
    client: Client,
    base_url: String,
}

impl AdvisorClient {
    /// Creates a client with the configured base URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl Advisor for AdvisorClient {
    async fn risk_profile(&self, answers: &[i32]) -> Result<String, AdvisorError> {
        let body = RiskProfileRequest {
            answers: answers.to_vec(),
        };

        let response: RiskProfileBody = self
            .client
            .post(self.url("/api/risk-profile"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.risk_profile)
    }

    async fn recommendations(&self, risk_profile: &str) -> Result<Recommendations, AdvisorError> {
        let body = RiskProfileBody {
            risk_profile: risk_profile.to_string(),
        };

        let response = self
            .client
            .post(self.url("/api/recommendations"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}
