//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::{JwtTokenIssuer, LoginAuthenticator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<LoginAuthenticator>,
    pub token_issuer: Arc<JwtTokenIssuer>,
    /// Absent when the router runs without a database (tests)
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        authenticator: Arc<LoginAuthenticator>,
        token_issuer: Arc<JwtTokenIssuer>,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            authenticator,
            token_issuer,
            db_pool,
        }
    }
}

impl FromRef<AppState> for Arc<LoginAuthenticator> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.authenticator.clone()
    }
}

impl FromRef<AppState> for Arc<JwtTokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.token_issuer.clone()
    }
}
