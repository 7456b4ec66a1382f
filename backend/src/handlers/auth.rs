//! Authentication HTTP handlers
//!
//! Endpoints for email/password login.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use super::AuthenticatedUser;
use crate::error::ApiResult;
use crate::models::{AuthTokensResponse, CurrentUserResponse, LoginRequest};
use crate::state::AppState;

/// POST /auth/login - Verify email and password and issue tokens
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthTokensResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let (access_token, refresh_token) = state.authenticator.authenticate(&req).await?;

    Ok(Json(AuthTokensResponse {
        access_token: access_token.token,
        refresh_token: refresh_token.token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_issuer.access_ttl_seconds(),
        refresh_expires_in: state.token_issuer.refresh_ttl_seconds(),
    }))
}

/// GET /auth/me - Identity carried by the presented access token
pub async fn get_current_user(user: AuthenticatedUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        user_id: user.user_id,
        name: user.name,
        email: user.email,
    })
}
