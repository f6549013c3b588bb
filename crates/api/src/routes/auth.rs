//! Registration, email verification and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extractors::JsonBody};
use mudra_core::auth::{CredentialsRequest, RegistrationOutcome, Session, VerifyOtpRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/login", post(login))
}

/// Account echoed back after registration.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    /// Account id.
    pub id: Uuid,
    /// Normalized email.
    pub email: String,
}

/// Body of a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Next step for the user.
    pub message: &'static str,
    /// The account the code was sent for.
    pub user: RegisteredUser,
}

/// Body carrying only a human-readable message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Outcome description.
    pub message: &'static str,
}

/// POST /auth/register - 201 for a new account, 200 when a code is resent.
async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let registration = state
        .auth
        .register(payload.email.as_deref(), payload.password.as_deref())
        .await?;

    let (status, message) = match registration.outcome {
        RegistrationOutcome::Created => (
            StatusCode::CREATED,
            "Registration successful. Check your email for the verification code.",
        ),
        RegistrationOutcome::OtpResent => (
            StatusCode::OK,
            "A new verification code has been sent to your email.",
        ),
    };

    Ok((
        status,
        Json(RegisterResponse {
            message,
            user: RegisteredUser {
                id: registration.user_id,
                email: registration.email,
            },
        }),
    ))
}

/// POST /auth/verify-otp
async fn verify_otp(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = state
        .auth
        .verify_otp(payload.email.as_deref(), payload.otp.as_deref())
        .await?;

    info!(user_id = %user.id, "Email verified");
    Ok(Json(MessageResponse {
        message: "Email verified successfully. You can now log in.",
    }))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .auth
        .login(payload.email.as_deref(), payload.password.as_deref())
        .await?;

    Ok(Json(session))
}
