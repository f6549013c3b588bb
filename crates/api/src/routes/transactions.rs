//! Expense transaction routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{JsonBody, PathParams},
    middleware::AuthUser,
};
use mudra_core::ledger::{Transaction, TransactionRequest};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
}

async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<TransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state.ledger.add(user.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.ledger.list(user.user_id()).await?))
}

async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams(id): PathParams<Uuid>,
    JsonBody(payload): JsonBody<TransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state.ledger.update(user.user_id(), id, payload).await?;
    Ok(Json(transaction))
}

async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    PathParams(id): PathParams<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.ledger.delete(user.user_id(), id).await?;
    Ok(Json(json!({ "message": "Transaction deleted successfully." })))
}
