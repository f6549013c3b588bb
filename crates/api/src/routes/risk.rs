//! Risk questionnaire route.

use axum::{Json, Router, extract::State, routing::post};

use crate::{AppState, error::ApiError, extractors::JsonBody, middleware::AuthUser};
use mudra_core::risk::{RiskAssessment, RiskSubmission};

/// Creates the risk routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/risk/submit", post(submit))
}

/// POST /risk/submit - 502 when the advisor cannot be reached.
async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<RiskSubmission>,
) -> Result<Json<RiskAssessment>, ApiError> {
    Ok(Json(state.risk.submit(user.user_id(), payload).await?))
}
