//! Authentication middleware
//!
//! Access-token verification and identity extraction.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{JwtTokenIssuer, TokenError};

/// Authenticated user extracted from an access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthRejection {
    error: AuthRejectionDetails,
}

#[derive(Debug, Serialize)]
struct AuthRejectionDetails {
    code: &'static str,
    message: &'static str,
}

impl AuthRejection {
    fn new(code: &'static str, message: &'static str) -> Self {
        Self {
            error: AuthRejectionDetails { code, message },
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Extractor for authenticated users
///
/// Verifies the bearer token from the Authorization header as an access
/// token. Refresh tokens are signed with a different key and are rejected.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, {}", user.name)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<JwtTokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthRejection::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response()
                })?;

        let issuer = Arc::<JwtTokenIssuer>::from_ref(state);

        let claims = issuer.verify_access_token(bearer.token()).map_err(|e| {
            let rejection = match e {
                TokenError::Expired => AuthRejection::new("TOKEN_EXPIRED", "Token has expired"),
                other => {
                    tracing::debug!(error = %other, "Rejected bearer token");
                    AuthRejection::new("INVALID_TOKEN", "Invalid token")
                }
            };
            rejection.into_response()
        })?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            name: claims.name,
            email: claims.email,
        })
    }
}
