//! Route definitions for the login API

use axum::{routing::get, Router};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

mod auth;

pub use auth::auth_routes;

/// Assemble the full application router
///
/// CORS and HSTS are environment-specific and layered on by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .merge(auth_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
