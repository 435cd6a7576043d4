//! Route definitions for the eolwatch HTTP API.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the route table. Middleware is added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(meta_routes())
        .merge(subscription_routes())
        .merge(callback_routes())
        .with_state(state)
}

/// Service info and health
fn meta_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::meta::service_info))
        .route("/health", get(handlers::health::health))
}

/// Subscription intake and the tracked pair listing
fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscribe/{technology}",
            post(handlers::subscription::subscribe),
        )
        .route(
            "/technologies",
            get(handlers::subscription::list_technologies),
        )
}

/// Authenticated callback
fn callback_routes() -> Router<AppState> {
    Router::new().route("/callback", post(handlers::callback::callback))
}
