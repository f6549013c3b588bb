//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Bearer-token authentication middleware
//! - Request extractors that report rejections as validation errors
//! - The JSON error body shared by every route

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mudra_core::Stores;
use mudra_core::auth::AuthService;
use mudra_core::budget::BudgetService;
use mudra_core::dashboard::DashboardService;
use mudra_core::goals::GoalService;
use mudra_core::ledger::LedgerService;
use mudra_core::risk::RiskService;
use mudra_shared::{Advisor, JwtService, OtpMailer};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration, OTP verification and login.
    pub auth: Arc<AuthService>,
    /// Expense transactions.
    pub ledger: Arc<LedgerService>,
    /// Monthly category budgets.
    pub budgets: Arc<BudgetService>,
    /// Savings goals.
    pub goals: Arc<GoalService>,
    /// Spending summaries.
    pub dashboard: Arc<DashboardService>,
    /// Risk questionnaire bridge.
    pub risk: Arc<RiskService>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Wires every service to its store and collaborators.
    #[must_use]
    pub fn new(
        stores: Stores,
        mailer: Arc<dyn OtpMailer>,
        advisor: Arc<dyn Advisor>,
        jwt_service: Arc<JwtService>,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(
                Arc::clone(&stores.users),
                mailer,
                Arc::clone(&jwt_service),
                otp_ttl,
            )),
            ledger: Arc::new(LedgerService::new(stores.transactions)),
            budgets: Arc::new(BudgetService::new(stores.budgets)),
            goals: Arc::new(GoalService::new(stores.goals)),
            dashboard: Arc::new(DashboardService::new(stores.summaries)),
            risk: Arc::new(RiskService::new(stores.users, advisor)),
            jwt_service,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
