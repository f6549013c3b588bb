//! Authentication error types.

use mudra_shared::{AppError, EmailError, JwtError};
use thiserror::Error;

use super::password::PasswordError;
use crate::store::StoreError;

/// Errors from registration, verification and login.
#[derive(Debug, Error)]
pub enum AuthError {
    // ========================================================================
    // Input Errors
    // ========================================================================
    /// Email or password missing or blank.
    #[error("Email and password are required.")]
    MissingCredentials,

    /// Email or OTP missing or blank on verification.
    #[error("Email and OTP are required.")]
    MissingOtpFields,

    /// Email is not syntactically valid.
    #[error("Please provide a valid email address.")]
    InvalidEmail,

    // ========================================================================
    // Account State Errors
    // ========================================================================
    /// A verified account already owns this email.
    #[error("An account with this email already exists.")]
    EmailTaken,

    /// No account for this email.
    #[error("User not found.")]
    UserNotFound,

    /// The account has no outstanding code.
    #[error("No pending verification for this account.")]
    NoPendingOtp,

    /// The presented code does not match.
    #[error("Invalid OTP.")]
    InvalidOtp,

    /// The code is past its expiry.
    #[error("OTP has expired. Please register again to receive a new code.")]
    OtpExpired,

    /// Unknown email or wrong password.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Login attempted before verification.
    #[error("Please verify your email before logging in.")]
    EmailNotVerified,

    // ========================================================================
    // Infrastructure Errors
    // ========================================================================
    /// The OTP email could not be delivered.
    #[error("Failed to send verification email: {0}")]
    MailDelivery(#[from] EmailError),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token issuing failed.
    #[error(transparent)]
    Token(#[from] JwtError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials
            | AuthError::MissingOtpFields
            | AuthError::InvalidEmail
            | AuthError::NoPendingOtp
            | AuthError::InvalidOtp
            | AuthError::OtpExpired => Self::Validation(err.to_string()),
            AuthError::EmailTaken => Self::Conflict(err.to_string()),
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::EmailNotVerified => Self::Forbidden(err.to_string()),
            AuthError::MailDelivery(_) => {
                Self::Upstream("Could not send the verification email. Please try again.".into())
            }
            AuthError::Password(e) => Self::Internal(e.to_string()),
            AuthError::Token(e) => Self::Internal(e.to_string()),
            AuthError::Store(StoreError::UniqueViolation(_)) => {
                Self::Conflict(AuthError::EmailTaken.to_string())
            }
            AuthError::Store(e) => e.into(),
        }
    }
}
