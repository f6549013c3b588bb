//! Dashboard summary route.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use mudra_core::dashboard::DashboardSummary;

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/summary", get(summary))
}

/// GET /dashboard/summary - months are calendar months in UTC.
async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.dashboard.summary(user.user_id(), today).await?))
}
