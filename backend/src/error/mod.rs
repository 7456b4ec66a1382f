//! HTTP error responses for the login endpoints
//!
//! Every failure is rendered as `{"error": {"code", "message"}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::LoginError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Body was not JSON or lacked a field
    #[error("{0}")]
    MalformedBody(String),

    #[error("Invalid login request: {0}")]
    InvalidRequest(#[from] ValidationErrors),

    #[error(transparent)]
    Login(#[from] LoginError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetails<'a>,
}

#[derive(Serialize)]
struct ErrorDetails<'a> {
    code: &'a str,
    message: String,
}

impl ApiError {
    /// Status and machine-readable code for this failure
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MalformedBody(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Login(LoginError::AccountNotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Login(LoginError::InvalidCredential) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            ApiError::Login(LoginError::TokenIssuanceFailed(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }

    /// Text sent to the client; signer failures stay in the logs
    fn public_message(&self) -> String {
        match self {
            ApiError::Login(LoginError::TokenIssuanceFailed(_)) => {
                "Could not complete login".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "Login request failed");
        } else {
            tracing::debug!(error = %self, code, "Login request rejected");
        }

        let body = ErrorBody {
            error: ErrorDetails {
                code,
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
