//! Route definitions for the DocSpace HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes, threading `state` through
/// every handler.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(me_routes())
        .merge(access_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Login, registration, logout, token validation
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/logout", get(handlers::auth::logout))
        .route("/auth/validate", get(handlers::auth::validate))
}

/// Self-service for the authenticated caller
fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/me/profile", get(handlers::me::get_profile))
        .route(
            "/v1/me/preferences",
            get(handlers::me::get_preferences).put(handlers::me::update_preferences),
        )
        .route(
            "/v1/me/change-password",
            axum::routing::put(handlers::me::change_password),
        )
        .route("/v1/me/sessions", get(handlers::me::list_sessions))
}

/// Authorization checks
fn access_routes() -> Router<AppState> {
    Router::new().route(
        "/v1/access/{resource_type}/{resource_id}",
        get(handlers::access::check_access),
    )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
