//! PostgreSQL pool backing the account store
//!
//! The login path issues a single read per request, so the pool is sized and
//! timed out from configuration rather than tuned here.

use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Database errors raised while starting up or probing health
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Could not connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Schema migration failed")]
    Migrate(#[from] MigrateError),

    #[error("Database unreachable")]
    Unreachable(#[source] sqlx::Error),
}

/// Pool settings derived from configuration
pub fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_seconds))
}

/// Open the pool and make sure at least one connection succeeds
pub async fn connect(config: &Config) -> Result<PgPool, DbError> {
    let url = config.database_url_masked();
    tracing::info!(%url, max_connections = config.db_max_connections, "Connecting to database");

    let pool = pool_options(config)
        .connect(&config.database_url)
        .await
        .map_err(|source| DbError::Connect {
            url: url.clone(),
            source,
        })?;

    tracing::info!(%url, "Database pool ready");
    Ok(pool)
}

/// Bring the `users` schema up to date
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database schema up to date");
    Ok(())
}

/// Round-trip a trivial query; used by `/health`
pub async fn ping(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DbError::Unreachable)?;
    Ok(())
}
