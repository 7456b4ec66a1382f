//! Middleware for the login API
//!
//! This module provides middleware for request tracing, security headers,
//! and access-token authentication.

pub mod auth;
mod security;
mod tracing;

pub use auth::AuthenticatedUser;
pub use security::{hsts_header, security_headers};
pub use self::tracing::request_tracing;
