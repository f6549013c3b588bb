//! Monthly budget routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{JsonBody, PathParams},
    middleware::AuthUser,
};
use mudra_core::budget::{
    Budget, BudgetLimitRequest, BudgetPeriodQuery, BudgetRequest, BudgetStatus,
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", post(set_budget))
        .route("/budgets/{year}/{month}", get(budgets_with_spending))
        .route("/budgets/{id}", put(update_limit).delete(delete_budget))
}

/// POST /budgets - creates the budget or overwrites the limit of an existing one.
async fn set_budget(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<BudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let budget = state.budgets.set(user.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /budgets/{year}/{month}
async fn budgets_with_spending(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams((year, month)): PathParams<(i32, u32)>,
) -> Result<Json<Vec<BudgetStatus>>, ApiError> {
    let query = BudgetPeriodQuery {
        month: Some(month),
        year: Some(year),
    };
    Ok(Json(state.budgets.with_spending(user.user_id(), query).await?))
}

/// PUT /budgets/{id} - limit only; category and period are fixed.
async fn update_limit(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams(id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<BudgetLimitRequest>,
) -> Result<Json<Budget>, ApiError> {
    let budget = state
        .budgets
        .update_limit(user.user_id(), id, payload)
        .await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.budgets.delete(user.user_id(), id).await?;
    Ok(Json(json!({ "message": "Budget deleted successfully." })))
}
