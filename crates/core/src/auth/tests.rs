//! Account lifecycle tests against the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use mudra_shared::JwtService;
use mudra_shared::config::JwtConfig;
use uuid::Uuid;

use super::*;
use crate::store::StoreResult;
use crate::testing::{InMemoryStore, RecordingMailer};

const PASSWORD: &str = "correct horse battery";

struct Harness {
    store: Arc<InMemoryStore>,
    mailer: Arc<RecordingMailer>,
    jwt: Arc<JwtService>,
    service: AuthService,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let jwt = Arc::new(JwtService::new(&JwtConfig {
        secret: "auth-tests-secret".to_string(),
        access_token_expiry_secs: 3600,
    }));
    let service = AuthService::new(
        store.clone(),
        mailer.clone(),
        jwt.clone(),
        Duration::minutes(10),
    );
    Harness {
        store,
        mailer,
        jwt,
        service,
    }
}

async fn registered_and_verified(h: &Harness, email: &str) {
    h.service.register(Some(email), Some(PASSWORD)).await.unwrap();
    let code = h.mailer.last_code_for(email).unwrap();
    h.service.verify_otp(Some(email), Some(code.as_str())).await.unwrap();
}

#[tokio::test]
async fn test_register_creates_unverified_user_and_mails_code() {
    let h = harness();

    let reg = h
        .service
        .register(Some("  Saver@Example.com "), Some(PASSWORD))
        .await
        .unwrap();

    assert_eq!(reg.outcome, RegistrationOutcome::Created);
    assert_eq!(reg.email, "saver@example.com");

    let user = h.store.user(reg.user_id).unwrap();
    assert!(!user.is_verified);
    assert_ne!(user.password_hash, PASSWORD);
    assert!(verify_password(PASSWORD, &user.password_hash).unwrap());

    let code = h.mailer.last_code_for("saver@example.com").unwrap();
    assert_eq!(user.otp_code.as_deref(), Some(code.as_str()));
    assert_eq!(code.len(), 6);
    assert_eq!(
        h.mailer.last_lifetime_for("saver@example.com"),
        Some(Duration::minutes(10))
    );
}

#[tokio::test]
async fn test_register_mail_states_configured_lifetime() {
    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let jwt = Arc::new(JwtService::new(&JwtConfig {
        secret: "auth-tests-secret".to_string(),
        access_token_expiry_secs: 3600,
    }));
    let service = AuthService::new(store, mailer.clone(), jwt, Duration::minutes(5));

    service
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap();
    assert_eq!(
        mailer.last_lifetime_for("saver@example.com"),
        Some(Duration::minutes(5))
    );
}

#[tokio::test]
async fn test_register_rejects_missing_or_malformed_input() {
    let h = harness();

    let err = h.service.register(None, Some(PASSWORD)).await.unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentials));

    let err = h
        .service
        .register(Some("saver@example.com"), Some("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentials));

    let err = h
        .service
        .register(Some("not-an-email"), Some(PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail));

    assert_eq!(h.mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_reregistering_unverified_replaces_code_and_password() {
    let h = harness();
    let first = h
        .service
        .register(Some("saver@example.com"), Some("first-password"))
        .await
        .unwrap();

    let second = h
        .service
        .register(Some("saver@example.com"), Some("second-password"))
        .await
        .unwrap();

    assert_eq!(second.outcome, RegistrationOutcome::OtpResent);
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(h.mailer.sent_count(), 2);

    let user = h.store.user(first.user_id).unwrap();
    assert!(verify_password("second-password", &user.password_hash).unwrap());
    assert_eq!(user.otp_code, h.mailer.last_code_for("saver@example.com"));
}

#[tokio::test]
async fn test_register_conflicts_once_verified() {
    let h = harness();
    registered_and_verified(&h, "saver@example.com").await;

    let err = h
        .service
        .register(Some("SAVER@example.com"), Some(PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
}

#[tokio::test]
async fn test_register_reports_mail_failure() {
    let h = harness();
    h.mailer.fail_sends(true);

    let err = h
        .service
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MailDelivery(_)));
}

#[tokio::test]
async fn test_verify_otp_marks_verified_and_is_single_use() {
    let h = harness();
    let reg = h
        .service
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap();
    let code = h.mailer.last_code_for("saver@example.com").unwrap();

    let user = h
        .service
        .verify_otp(Some("saver@example.com"), Some(code.as_str()))
        .await
        .unwrap();
    assert!(user.is_verified);
    assert_eq!(user.otp_code, None);
    assert_eq!(user.otp_expires_at, None);
    assert!(h.store.user(reg.user_id).unwrap().is_verified);

    let err = h
        .service
        .verify_otp(Some("saver@example.com"), Some(code.as_str()))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NoPendingOtp));
}

#[tokio::test]
async fn test_verify_otp_rejects_wrong_code() {
    let h = harness();
    h.service
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap();
    let code = h.mailer.last_code_for("saver@example.com").unwrap();
    let wrong = if code == "111111" { "222222" } else { "111111" };

    let err = h
        .service
        .verify_otp(Some("saver@example.com"), Some(wrong))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidOtp));
}

#[tokio::test]
async fn test_verify_otp_rejects_expired_code() {
    let h = harness();
    let reg = h
        .service
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap();
    let code = h.mailer.last_code_for("saver@example.com").unwrap();
    h.store.expire_otp(reg.user_id);

    let err = h
        .service
        .verify_otp(Some("saver@example.com"), Some(code.as_str()))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::OtpExpired));
    assert!(!h.store.user(reg.user_id).unwrap().is_verified);
}

#[tokio::test]
async fn test_verify_otp_unknown_user() {
    let h = harness();
    let err = h
        .service
        .verify_otp(Some("ghost@example.com"), Some("123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}

#[tokio::test]
async fn test_login_issues_token_for_verified_user() {
    let h = harness();
    registered_and_verified(&h, "saver@example.com").await;

    let session = h
        .service
        .login(Some("Saver@Example.com"), Some(PASSWORD))
        .await
        .unwrap();

    assert_eq!(session.token_type, "Bearer");
    assert_eq!(session.expires_in, 3600);
    assert_eq!(session.user.email, "saver@example.com");

    let claims = h.jwt.validate_token(&session.token).unwrap();
    assert_eq!(claims.user_id(), session.user.id);
}

#[tokio::test]
async fn test_login_failures_do_not_reveal_which_part_was_wrong() {
    let h = harness();
    registered_and_verified(&h, "saver@example.com").await;

    let unknown = h
        .service
        .login(Some("ghost@example.com"), Some(PASSWORD))
        .await
        .unwrap_err();
    let wrong_password = h
        .service
        .login(Some("saver@example.com"), Some("nope"))
        .await
        .unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert_eq!(unknown.to_string(), wrong_password.to_string());
}

#[tokio::test]
async fn test_login_requires_verification() {
    let h = harness();
    h.service
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap();

    let err = h
        .service
        .login(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailNotVerified));
}

/// Misses the first email lookup, as if another request inserted the
/// account between this request's lookup and insert.
struct StaleFirstLookup {
    inner: Arc<InMemoryStore>,
    stale: AtomicBool,
}

#[async_trait]
impl UserStore for StaleFirstLookup {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        if self.stale.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.find_by_email(email).await
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        self.inner.create(user).await
    }

    async fn reissue_otp(
        &self,
        user_id: Uuid,
        password_hash: &str,
        otp: &IssuedOtp,
    ) -> StoreResult<Option<User>> {
        self.inner.reissue_otp(user_id, password_hash, otp).await
    }

    async fn consume_otp(&self, user_id: Uuid, code: &str) -> StoreResult<Option<User>> {
        self.inner.consume_otp(user_id, code).await
    }

    async fn set_risk_profile(&self, user_id: Uuid, risk_profile: &str) -> StoreResult<()> {
        self.inner.set_risk_profile(user_id, risk_profile).await
    }
}

fn racing_service(h: &Harness) -> AuthService {
    AuthService::new(
        Arc::new(StaleFirstLookup {
            inner: h.store.clone(),
            stale: AtomicBool::new(true),
        }),
        h.mailer.clone(),
        h.jwt.clone(),
        Duration::minutes(10),
    )
}

#[tokio::test]
async fn test_register_losing_insert_race_resends_code() {
    let h = harness();
    let first = h
        .service
        .register(Some("saver@example.com"), Some("first-password"))
        .await
        .unwrap();

    let second = racing_service(&h)
        .register(Some("saver@example.com"), Some("second-password"))
        .await
        .unwrap();

    assert_eq!(second.outcome, RegistrationOutcome::OtpResent);
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(h.mailer.sent_count(), 2);

    let user = h.store.user(first.user_id).unwrap();
    assert!(verify_password("second-password", &user.password_hash).unwrap());
    assert_eq!(user.otp_code, h.mailer.last_code_for("saver@example.com"));
}

#[tokio::test]
async fn test_register_losing_insert_race_to_verified_account_conflicts() {
    let h = harness();
    registered_and_verified(&h, "saver@example.com").await;

    let err = racing_service(&h)
        .register(Some("saver@example.com"), Some(PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(h.mailer.sent_count(), 1);
}
