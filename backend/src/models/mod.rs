//! Data models for the login service

use serde::Serialize;

pub mod auth;
pub use auth::*;

/// Account row as stored by the user-management subsystem.
///
/// Read-only from the point of view of this service. The `password`
/// column holds the bcrypt hash, never the plaintext.
#[derive(Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

// Keep the hash out of logs and panic messages.
impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}
