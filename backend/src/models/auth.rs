//! Authentication models for the login service

use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Credentials submitted to `POST /auth/login`
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Auth tokens response
#[derive(Debug, Serialize)]
pub struct AuthTokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    /// Seconds until the refresh token expires
    pub refresh_expires_in: i64,
}

/// Identity carried by a verified access token
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}
