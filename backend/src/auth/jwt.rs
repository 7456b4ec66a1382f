//! JWT token generation and validation
//!
//! Handles creation and verification of access and refresh tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::models::Account;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Missing signing secret for {0} tokens")]
    MissingSecret(&'static str),

    #[error("Token encoding failed: {0}")]
    EncodingFailed(#[source] jsonwebtoken::errors::Error),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(#[source] jsonwebtoken::errors::Error),

    #[error("Token expired")]
    Expired,

    #[error("Invalid {0} token lifetime: must be positive and representable")]
    InvalidLifetime(&'static str),

    #[error("Token expiry falls outside the supported date range")]
    ExpiryOutOfRange,
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

impl AccessClaims {
    pub fn for_account(account: &Account) -> Self {
        Self {
            user_id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}

/// Claims carried by a refresh token.
///
/// Only the identity, so a refresh token never carries stale profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "userID")]
    pub user_id: i64,
}

impl RefreshClaims {
    pub fn for_account(account: &Account) -> Self {
        Self {
            user_id: account.id,
        }
    }
}

/// Signed access token
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signed refresh token
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signer that turns a claim set into a serialized, verifiable token
pub trait TokenIssuer: Send + Sync {
    fn issue_access_token(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError>;

    fn issue_refresh_token(&self, claims: &RefreshClaims) -> Result<RefreshToken, TokenError>;
}

/// Payload actually signed: the typed claims plus registered time claims
#[derive(Serialize, Deserialize)]
struct Signed<C> {
    #[serde(flatten)]
    claims: C,
    iat: i64,
    exp: i64,
}

/// HS256 JWT issuer with separate keys and lifetimes per token kind
#[derive(Clone)]
pub struct JwtTokenIssuer {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenIssuer {
    /// Create a new issuer
    ///
    /// # Arguments
    /// * `access_secret` - HMAC secret for access tokens
    /// * `refresh_secret` - HMAC secret for refresh tokens
    /// * `access_ttl_seconds` - Access token time-to-live in seconds
    /// * `refresh_ttl_days` - Refresh token time-to-live in days
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        access_ttl_seconds: i64,
        refresh_ttl_days: i64,
    ) -> Result<Self, TokenError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        if access_secret.is_empty() {
            return Err(TokenError::MissingSecret("access"));
        }
        if refresh_secret.is_empty() {
            return Err(TokenError::MissingSecret("refresh"));
        }

        let access_ttl = Some(access_ttl_seconds)
            .filter(|&secs| secs > 0)
            .and_then(Duration::try_seconds)
            .ok_or(TokenError::InvalidLifetime("access"))?;
        let refresh_ttl = Some(refresh_ttl_days)
            .filter(|&days| days > 0)
            .and_then(Duration::try_days)
            .ok_or(TokenError::InvalidLifetime("refresh"))?;

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Access token lifetime in seconds
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    /// Verify and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        verify(token, &self.access_secret)
    }

    /// Verify and decode a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        verify(token, &self.refresh_secret)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_access_token(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError> {
        let (token, expires_at) = sign(claims, &self.access_secret, self.access_ttl)?;
        Ok(AccessToken { token, expires_at })
    }

    fn issue_refresh_token(&self, claims: &RefreshClaims) -> Result<RefreshToken, TokenError> {
        let (token, expires_at) = sign(claims, &self.refresh_secret, self.refresh_ttl)?;
        Ok(RefreshToken { token, expires_at })
    }
}

fn sign<C: Serialize>(
    claims: &C,
    secret: &str,
    ttl: Duration,
) -> Result<(String, DateTime<Utc>), TokenError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or(TokenError::ExpiryOutOfRange)?;

    let payload = Signed {
        claims,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::EncodingFailed)?;

    Ok((token, expires_at))
}

fn verify<C: DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Signed<C>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        if matches!(e.kind(), ErrorKind::ExpiredSignature) {
            TokenError::Expired
        } else {
            TokenError::DecodingFailed(e)
        }
    })?;

    Ok(data.claims.claims)
}
