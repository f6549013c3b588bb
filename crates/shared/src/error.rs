//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication failed (bad or missing credentials).
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Credentials are valid but the account may not proceed.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found, or not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An external collaborator (advisor, mail transport) failed.
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Upstream(_) => 502,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Upstream(_) => "upstream_error",
            Self::Database(_) | Self::Internal(_) => "internal_error",
        }
    }

    /// Returns true for errors whose details must not reach the client.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// Message that is safe to return to the client.
    ///
    /// Server-side failures collapse to a generic sentence; everything else
    /// carries the message it was constructed with.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Upstream(m) => m,
            Self::Database(_) | Self::Internal(_) => "An unexpected error occurred.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation(String::new()), 400, "validation_error")]
    #[case(AppError::Unauthorized(String::new()), 401, "unauthorized")]
    #[case(AppError::Forbidden(String::new()), 403, "forbidden")]
    #[case(AppError::NotFound(String::new()), 404, "not_found")]
    #[case(AppError::Conflict(String::new()), 409, "conflict")]
    #[case(AppError::Upstream(String::new()), 502, "upstream_error")]
    #[case(AppError::Database(String::new()), 500, "internal_error")]
    #[case(AppError::Internal(String::new()), 500, "internal_error")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Upstream("msg".into()).to_string(),
            "Upstream service error: msg"
        );
        assert_eq!(
            AppError::Database("msg".into()).to_string(),
            "Database error: msg"
        );
    }

    #[test]
    fn test_public_message_hides_server_details() {
        let err = AppError::Database("relation \"users\" does not exist".into());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "An unexpected error occurred.");

        let err = AppError::NotFound("Goal not found.".into());
        assert!(!err.is_server_error());
        assert_eq!(err.public_message(), "Goal not found.");
    }
}
