//! Registration, OTP verification and login.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mudra_shared::{JwtService, OtpMailer};
use tracing::{info, warn};
use validator::ValidateEmail;

use super::error::AuthError;
use super::otp::{self, IssuedOtp};
use super::password::{burn_verification, hash_password, verify_password};
use super::types::{
    NewUser, Registration, RegistrationOutcome, Session, SessionUser, User, UserStore,
};
use crate::store::StoreError;

/// Account lifecycle service.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn OtpMailer>,
    jwt: Arc<JwtService>,
    otp_ttl: Duration,
}

/// Trims and lower-cases an email, then checks its syntax.
fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    if !email.validate_email() {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

/// Returns the value if present and not blank.
fn required(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl AuthService {
    /// Creates the service. `otp_ttl` bounds how long a code is accepted.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn OtpMailer>,
        jwt: Arc<JwtService>,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            users,
            mailer,
            jwt,
            otp_ttl,
        }
    }

    /// Registers an account, or refreshes a still-unverified one, and mails a
    /// fresh code.
    ///
    /// # Errors
    ///
    /// - `MissingCredentials` / `InvalidEmail` on bad input
    /// - `EmailTaken` if a verified account owns the email
    /// - `MailDelivery` if the code could not be sent
    pub async fn register(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Registration, AuthError> {
        let (Some(email), Some(password)) = (required(email), required(password)) else {
            return Err(AuthError::MissingCredentials);
        };
        let email = normalize_email(email)?;

        let password_hash = hash_password(password)?;
        let otp = IssuedOtp::issue(Utc::now(), self.otp_ttl);

        let (user, outcome) = match self.users.find_by_email(&email).await? {
            Some(existing) => (
                self.refresh_pending(existing, &password_hash, &otp).await?,
                RegistrationOutcome::OtpResent,
            ),
            None => match self
                .users
                .create(NewUser {
                    email: email.clone(),
                    password_hash: password_hash.clone(),
                    otp: otp.clone(),
                })
                .await
            {
                Ok(user) => (user, RegistrationOutcome::Created),
                // A concurrent registration inserted the same email first.
                Err(StoreError::UniqueViolation(_)) => {
                    let existing = self
                        .users
                        .find_by_email(&email)
                        .await?
                        .ok_or(AuthError::EmailTaken)?;
                    (
                        self.refresh_pending(existing, &password_hash, &otp).await?,
                        RegistrationOutcome::OtpResent,
                    )
                }
                Err(e) => return Err(e.into()),
            },
        };

        if let Err(e) = self
            .mailer
            .send_otp(&user.email, &otp.code, self.otp_ttl)
            .await
        {
            warn!(user_id = %user.id, error = %e, "OTP delivery failed");
            return Err(e.into());
        }

        info!(user_id = %user.id, ?outcome, "Registration OTP issued");
        Ok(Registration {
            user_id: user.id,
            email: user.email,
            outcome,
        })
    }

    /// Replaces the password and code of an account that is not yet verified.
    async fn refresh_pending(
        &self,
        existing: User,
        password_hash: &str,
        otp: &IssuedOtp,
    ) -> Result<User, AuthError> {
        if existing.is_verified {
            return Err(AuthError::EmailTaken);
        }
        self.users
            .reissue_otp(existing.id, password_hash, otp)
            .await?
            // Verified between the lookup and the update.
            .ok_or(AuthError::EmailTaken)
    }

    /// Confirms an account with the code it was mailed.
    ///
    /// A code can be consumed at most once.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` for an unknown email
    /// - `InvalidOtp` / `OtpExpired` / `NoPendingOtp` for a bad code
    pub async fn verify_otp(
        &self,
        email: Option<&str>,
        code: Option<&str>,
    ) -> Result<User, AuthError> {
        let (Some(email), Some(code)) = (required(email), required(code)) else {
            return Err(AuthError::MissingOtpFields);
        };
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        otp::check(
            user.otp_code.as_deref(),
            user.otp_expires_at,
            code,
            Utc::now(),
        )?;

        let verified = self
            .users
            .consume_otp(user.id, code.trim())
            .await?
            // Lost a race with another verification or a re-registration.
            .ok_or(AuthError::InvalidOtp)?;

        info!(user_id = %verified.id, "Email verified");
        Ok(verified)
    }

    /// Exchanges credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` for an unknown email or wrong password
    /// - `EmailNotVerified` for a correct password on an unverified account
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Session, AuthError> {
        let (Some(email), Some(password)) = (required(email), required(password)) else {
            return Err(AuthError::MissingCredentials);
        };
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            burn_verification(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let token = self.jwt.generate_access_token(user.id, &user.email)?;

        info!(user_id = %user.id, "User logged in");
        Ok(Session {
            token,
            token_type: "Bearer",
            expires_in: self.jwt.access_token_expires_in(),
            user: SessionUser {
                id: user.id,
                email: user.email,
            },
        })
    }
}
