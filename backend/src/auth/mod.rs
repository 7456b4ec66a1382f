//! Authentication module
//!
//! Email/password login issuing JWT access and refresh tokens.
//! - Account lookup behind `UserStore`
//! - bcrypt password verification behind `PasswordVerifier`
//! - Token signing and verification behind `TokenIssuer`

mod jwt;
mod password;
mod service;
mod store;

pub use jwt::{
    AccessClaims, AccessToken, JwtTokenIssuer, RefreshClaims, RefreshToken, TokenError,
    TokenIssuer,
};
pub use password::{hash_password, BcryptVerifier, PasswordVerifier};
pub use service::{LoginAuthenticator, LoginError};
pub use store::{PgUserStore, StoreError, UserStore};
