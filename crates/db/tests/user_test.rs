//! Integration tests for the user repository.

mod common;

use chrono::Utc;
use mudra_core::StoreError;
use mudra_core::auth::{IssuedOtp, NewUser, UserStore};
use mudra_db::UserRepository;

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_user_create_and_find() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;

    assert!(!user.is_verified);
    assert!(user.otp_code.is_some());

    let by_email = repo
        .find_by_email(&user.email)
        .await
        .expect("query failed")
        .expect("user should exist");
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.email, user.email);

    let missing = repo
        .find_by_email("nobody@example.invalid")
        .await
        .expect("query failed");
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_duplicate_email_is_unique_violation() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;

    let err = repo
        .create(NewUser {
            email: user.email.clone(),
            password_hash: "$argon2id$other".to_string(),
            otp: IssuedOtp::issue(Utc::now(), chrono::Duration::minutes(10)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_consume_otp_only_once() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;
    let code = user.otp_code.clone().expect("code set on create");

    let wrong = repo.consume_otp(user.id, "000000").await.expect("query failed");
    assert!(wrong.is_none());

    let verified = repo
        .consume_otp(user.id, &code)
        .await
        .expect("query failed")
        .expect("code should match");
    assert!(verified.is_verified);
    assert_eq!(verified.otp_code, None);

    let again = repo.consume_otp(user.id, &code).await.expect("query failed");
    assert!(again.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_reissue_only_while_unverified() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;

    let otp = IssuedOtp::issue(Utc::now(), chrono::Duration::minutes(10));
    let reissued = repo
        .reissue_otp(user.id, "$argon2id$new_hash", &otp)
        .await
        .expect("query failed")
        .expect("user is unverified");
    assert_eq!(reissued.password_hash, "$argon2id$new_hash");
    assert_eq!(reissued.otp_code.as_deref(), Some(otp.code.as_str()));

    repo.consume_otp(user.id, &otp.code)
        .await
        .expect("query failed")
        .expect("code should match");

    let after = repo
        .reissue_otp(user.id, "$argon2id$late", &otp)
        .await
        .expect("query failed");
    assert!(after.is_none());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn test_set_risk_profile() {
    let db = common::connect().await;
    let repo = UserRepository::new(db.clone());
    let user = common::new_user(&db).await;

    repo.set_risk_profile(user.id, "Aggressive")
        .await
        .expect("update failed");

    let found = repo
        .find_by_email(&user.email)
        .await
        .expect("query failed")
        .expect("user should exist");
    assert_eq!(found.risk_profile.as_deref(), Some("Aggressive"));
}
