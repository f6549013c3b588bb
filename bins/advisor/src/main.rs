//! Mudra advisor
//!
//! Serves the recommendation contract the API server calls, scoring answers
//! locally and returning a fixed portfolio per profile:
//! - `POST /api/risk-profile {answers}` → `{risk_profile}`
//! - `POST /api/recommendations {risk_profile}` → portfolio
//! - `GET /` → liveness message

use anyhow::Context;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mudra_core::risk::RiskProfile;
use mudra_shared::Recommendations;
use mudra_shared::advisor::{RiskProfileBody, RiskProfileRequest};
use mudra_shared::config::AdvisorServerConfig;

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "validation_error", "message": message })),
    )
        .into_response()
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Mudra-Plan advisor is running." }))
}

async fn risk_profile(
    Json(body): Json<RiskProfileRequest>,
) -> Result<Json<RiskProfileBody>, Response> {
    if body.answers.is_empty() {
        return Err(bad_request("At least one answer is required."));
    }

    let profile = RiskProfile::from_answers(&body.answers);
    debug!(answers = body.answers.len(), %profile, "Scored questionnaire");
    Ok(Json(RiskProfileBody {
        risk_profile: profile.to_string(),
    }))
}

async fn recommendations(
    Json(body): Json<RiskProfileBody>,
) -> Result<Json<Recommendations>, Response> {
    body.risk_profile
        .parse::<RiskProfile>()
        .map(|profile| Json(profile.recommendations()))
        .map_err(|_| bad_request("Invalid risk profile provided."))
}

fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/risk-profile", post(risk_profile))
        .route("/api/recommendations", post(recommendations))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AdvisorServerConfig::load().context("Failed to load advisor configuration")?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Advisor listening on {}", addr);

    axum::serve(listener, router()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_scores_answers() {
        let (status, body) =
            post_json("/api/risk-profile", json!({ "answers": [5, 5, 5, 2] })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "risk_profile": "Aggressive" }));
    }

    #[tokio::test]
    async fn test_rejects_empty_answers() {
        let (status, _) = post_json("/api/risk-profile", json!({ "answers": [] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommendations_per_profile() {
        let (status, body) =
            post_json("/api/recommendations", json!({ "risk_profile": "Conservative" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["portfolio"][0]["instrument"], "Fixed Deposit (FD)");
    }

    #[tokio::test]
    async fn test_unknown_profile_is_bad_request() {
        let (status, body) =
            post_json("/api/recommendations", json!({ "risk_profile": "Reckless" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid risk profile provided.");
    }
}
