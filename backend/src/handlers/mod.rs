//! API handlers for the login service

pub mod auth;
pub mod health;

pub use auth::*;
pub use health::*;

// Re-export AuthenticatedUser from middleware for handler use
pub use crate::middleware::auth::AuthenticatedUser;
