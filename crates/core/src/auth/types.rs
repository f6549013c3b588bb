//! Account types and the credential store seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::otp::IssuedOtp;
use crate::store::StoreResult;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account id.
    pub id: Uuid,
    /// Normalized (trimmed, lower-case) email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Whether the email has been confirmed.
    pub is_verified: bool,
    /// Outstanding verification code, if any.
    pub otp_code: Option<String>,
    /// Expiry of the outstanding code.
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// Last risk-profile label from the questionnaire.
    pub risk_profile: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Fields for a brand-new, unverified account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Code sent to the email.
    pub otp: IssuedOtp,
}

/// Body of `POST /api/auth/register` and `POST /api/auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsRequest {
    /// Account email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Body of `POST /api/auth/verify-otp`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyOtpRequest {
    /// Account email.
    pub email: Option<String>,
    /// Six-digit code from the email.
    pub otp: Option<String>,
}

/// Whether registration created an account or refreshed a pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new unverified account was created.
    Created,
    /// An existing unverified account got a new password and code.
    OtpResent,
}

/// Result of a registration.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Account id.
    pub user_id: Uuid,
    /// Normalized email the code was sent to.
    pub email: String,
    /// What happened.
    pub outcome: RegistrationOutcome,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Signed bearer token.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Seconds until the token expires.
    pub expires_in: i64,
    /// The authenticated account.
    pub user: SessionUser,
}

/// Public view of the authenticated account.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    /// Account id.
    pub id: Uuid,
    /// Account email.
    pub email: String,
}

/// Persistence for accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up an account by normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts an unverified account.
    ///
    /// Fails with `StoreError::UniqueViolation` if the email is taken.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Replaces the password and code of an account that is still unverified.
    ///
    /// Returns `None` if the account is missing or already verified.
    async fn reissue_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp: &IssuedOtp,
    ) -> StoreResult<Option<User>>;

    /// Marks the account verified and clears its code, but only while the
    /// stored code still equals `code`.
    ///
    /// Returns `None` when the code was already consumed or replaced.
    async fn consume_otp(&self, user_id: Uuid, code: &str) -> StoreResult<Option<User>>;

    /// Records the latest risk-profile label.
    async fn set_risk_profile(&self, user_id: Uuid, risk_profile: &str) -> StoreResult<()>;
}
