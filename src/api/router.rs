use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::me;
use super::middleware::jwt_authentication;
use super::state::AppState;

/// Create the router with bearer authentication applied to every route
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/me", get(me::current_identity))
        .layer(from_fn_with_state(state.clone(), jwt_authentication))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
