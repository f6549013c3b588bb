//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod auth;
pub mod budgets;
pub mod dashboard;
pub mod goals;
pub mod health;
pub mod risk;
pub mod transactions;

/// Creates the API router: public health and auth routes, everything else
/// behind the bearer-token middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(transactions::routes())
        .merge(budgets::routes())
        .merge(dashboard::routes())
        .merge(goals::routes())
        .merge(risk::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
