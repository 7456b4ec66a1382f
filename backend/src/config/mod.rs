//! Configuration management for the login service
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::str::FromStr;
use thiserror::Error;

const DEV_ACCESS_SECRET: &str = "development-access-secret-change-in-production";
const DEV_REFRESH_SECRET: &str = "development-refresh-secret-change-in-production";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection before failing the lookup
    pub db_acquire_timeout_seconds: u64,

    /// Seconds an idle pooled connection is kept open
    pub db_idle_timeout_seconds: u64,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Secret for signing access tokens
    pub jwt_access_secret: String,

    /// Secret for signing refresh tokens
    pub jwt_refresh_secret: String,

    /// Access token TTL in seconds (default: 900 = 15 minutes)
    pub jwt_access_token_ttl_seconds: i64,

    /// Refresh token TTL in days (default: 7)
    pub jwt_refresh_token_ttl_days: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = positive(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let db_acquire_timeout_seconds = positive(&lookup, "DB_ACQUIRE_TIMEOUT_SECONDS", 5u64)?;
        let db_idle_timeout_seconds = positive(&lookup, "DB_IDLE_TIMEOUT_SECONDS", 600u64)?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS");

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        // Development may fall back to well-known secrets, production may not
        let secret = |key: &str, fallback: &str| match lookup(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ if environment.is_production() => Err(ConfigError::MissingEnvVar(key.to_string())),
            _ => Ok(fallback.to_string()),
        };

        let jwt_access_secret = secret("JWT_ACCESS_SECRET", DEV_ACCESS_SECRET)?;
        let jwt_refresh_secret = secret("JWT_REFRESH_SECRET", DEV_REFRESH_SECRET)?;

        let jwt_access_token_ttl_seconds =
            positive(&lookup, "JWT_ACCESS_TOKEN_TTL_SECONDS", 900i64)?;
        let jwt_refresh_token_ttl_days = positive(&lookup, "JWT_REFRESH_TOKEN_TTL_DAYS", 7i64)?;

        Ok(Config {
            database_url,
            environment,
            port,
            db_max_connections,
            db_acquire_timeout_seconds,
            db_idle_timeout_seconds,
            cors_allowed_origins,
            log_level,
            jwt_access_secret,
            jwt_refresh_secret,
            jwt_access_token_ttl_seconds,
            jwt_refresh_token_ttl_days,
        })
    }

    /// Get database URL (useful for logging masked version)
    pub fn database_url_masked(&self) -> String {
        // Mask password in database URL for logging
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }
}

/// Read a strictly positive number, or `default` when the variable is unset
fn positive<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidValue(format!(
            "{} must be a positive number, got '{}'",
            key, raw
        ))),
    }
}
