//! Savings goal routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{JsonBody, PathParams},
    middleware::AuthUser,
};
use mudra_core::goals::{ContributionRequest, Goal, GoalRequest};

/// Creates the goal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/{id}", delete(delete_goal))
        .route("/goals/{id}/contribute", put(contribute))
}

async fn create_goal(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<GoalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let goal = state.goals.create(user.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn list_goals(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Goal>>, ApiError> {
    Ok(Json(state.goals.list(user.user_id()).await?))
}

/// PUT /goals/{id}/contribute
async fn contribute(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams(id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<ContributionRequest>,
) -> Result<Json<Goal>, ApiError> {
    let goal = state.goals.contribute(user.user_id(), id, payload).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.goals.delete(user.user_id(), id).await?;
    Ok(Json(json!({ "message": "Goal deleted successfully." })))
}
