//! Authentication service
//!
//! Core business logic for email/password login.

use std::sync::Arc;

use thiserror::Error;

use crate::models::LoginRequest;

use super::jwt::{AccessClaims, AccessToken, RefreshClaims, RefreshToken, TokenError, TokenIssuer};
use super::password::{PasswordVerifier, DECOY_HASH};
use super::store::UserStore;

/// Login errors
#[derive(Error, Debug)]
pub enum LoginError {
    /// Covers both an unknown email and a failed lookup
    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Token issuance failed: {0}")]
    TokenIssuanceFailed(#[source] TokenError),
}

/// Verifies credentials and issues the access/refresh token pair
#[derive(Clone)]
pub struct LoginAuthenticator {
    users: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordVerifier>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginAuthenticator {
    /// Create a new LoginAuthenticator
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordVerifier>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Authenticate a shape-validated login request.
    ///
    /// Either both tokens are returned or none is.
    #[tracing::instrument(name = "login", skip_all)]
    pub async fn authenticate(
        &self,
        request: &LoginRequest,
    ) -> Result<(AccessToken, RefreshToken), LoginError> {
        let account = match self.users.find_by_email(&request.email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                tracing::debug!("No account registered for email");
                return Err(self.reject_unknown(&request.password));
            }
            Err(e) => {
                // Reported to the caller exactly like a miss
                tracing::warn!(error = %e, "Account lookup failed");
                return Err(self.reject_unknown(&request.password));
            }
        };

        if !self
            .passwords
            .verify(&account.password_hash, &request.password)
        {
            tracing::info!(user_id = account.id, "Password mismatch");
            return Err(LoginError::InvalidCredential);
        }

        let access_token = self
            .tokens
            .issue_access_token(&AccessClaims::for_account(&account))
            .map_err(|e| {
                tracing::error!(user_id = account.id, error = %e, "Failed to issue access token");
                LoginError::TokenIssuanceFailed(e)
            })?;

        let refresh_token = self
            .tokens
            .issue_refresh_token(&RefreshClaims::for_account(&account))
            .map_err(|e| {
                tracing::error!(user_id = account.id, error = %e, "Failed to issue refresh token");
                LoginError::TokenIssuanceFailed(e)
            })?;

        tracing::info!(user_id = account.id, "Login succeeded");

        Ok((access_token, refresh_token))
    }

    /// Spend one hash comparison so an unknown email answers no faster
    /// than a wrong password.
    fn reject_unknown(&self, candidate: &str) -> LoginError {
        let _ = self.passwords.verify(DECOY_HASH, candidate);
        LoginError::AccountNotFound
    }
}
