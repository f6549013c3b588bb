//! Risk bridge tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::auth::{IssuedOtp, NewUser, UserStore};
use crate::testing::{AdvisorFailure, InMemoryStore, StubAdvisor};

async fn user(store: &InMemoryStore) -> Uuid {
    store
        .create(NewUser {
            email: "investor@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            otp: IssuedOtp::issue(Utc::now(), chrono::Duration::minutes(10)),
        })
        .await
        .unwrap()
        .id
}

fn answers(values: &[i32]) -> RiskSubmission {
    RiskSubmission {
        answers: Some(values.to_vec()),
    }
}

#[tokio::test]
async fn test_submit_records_profile_and_returns_recommendations() {
    let store = Arc::new(InMemoryStore::new());
    let advisor = Arc::new(StubAdvisor::new());
    let service = RiskService::new(store.clone(), advisor.clone());
    let user_id = user(&store).await;

    let assessment = service.submit(user_id, answers(&[4, 3, 5])).await.unwrap();

    assert_eq!(assessment.risk_profile, "Moderate");
    assert_eq!(
        assessment.recommendations,
        RiskProfile::Moderate.recommendations()
    );
    assert_eq!(
        store.user(user_id).unwrap().risk_profile.as_deref(),
        Some("Moderate")
    );
    assert_eq!(advisor.calls(), 2);
}

#[tokio::test]
async fn test_submit_rejects_empty_answers_without_calling_advisor() {
    let store = Arc::new(InMemoryStore::new());
    let advisor = Arc::new(StubAdvisor::new());
    let service = RiskService::new(store.clone(), advisor.clone());
    let user_id = user(&store).await;

    let err = service.submit(user_id, answers(&[])).await.unwrap_err();
    assert!(matches!(err, RiskError::NoAnswers));

    let err = service
        .submit(user_id, RiskSubmission { answers: None })
        .await
        .unwrap_err();
    assert!(matches!(err, RiskError::NoAnswers));

    assert_eq!(advisor.calls(), 0);
}

#[tokio::test]
async fn test_profile_failure_leaves_user_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let advisor = Arc::new(StubAdvisor::failing(AdvisorFailure::RiskProfile));
    let service = RiskService::new(store.clone(), advisor);
    let user_id = user(&store).await;

    let err = service.submit(user_id, answers(&[5, 5, 5, 5])).await.unwrap_err();
    assert!(matches!(err, RiskError::Advisor(_)));
    assert_eq!(store.user(user_id).unwrap().risk_profile, None);

    let app: mudra_shared::AppError = err.into();
    assert_eq!(app.status_code(), 502);
}

#[tokio::test]
async fn test_recommendation_failure_is_upstream_error() {
    let store = Arc::new(InMemoryStore::new());
    let advisor = Arc::new(StubAdvisor::failing(AdvisorFailure::Recommendations));
    let service = RiskService::new(store.clone(), advisor);
    let user_id = user(&store).await;

    let err = service.submit(user_id, answers(&[1, 1])).await.unwrap_err();
    assert!(matches!(err, RiskError::Advisor(_)));

    // The label was produced before the failing call and is kept.
    assert_eq!(
        store.user(user_id).unwrap().risk_profile.as_deref(),
        Some("Conservative")
    );
}
