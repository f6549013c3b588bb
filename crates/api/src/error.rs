//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use mudra_core::StoreError;
use mudra_core::auth::AuthError;
use mudra_core::budget::BudgetError;
use mudra_core::goals::GoalError;
use mudra_core::ledger::LedgerError;
use mudra_core::risk::RiskError;
use mudra_shared::AppError;

/// An [`AppError`] rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

macro_rules! via_app_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for ApiError {
                fn from(err: $source) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

via_app_error!(StoreError, AuthError, LedgerError, BudgetError, GoalError, RiskError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_server_error() {
            error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": err.public_message(),
            })),
        )
            .into_response()
    }
}
