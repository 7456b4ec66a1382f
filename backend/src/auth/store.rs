//! Account lookup
//!
//! The login flow only ever reads accounts; writes belong to user management.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::Account;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to accounts keyed by email
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the account registered under `email`, if any
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
}

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgUserStore {
    db_pool: PgPool,
}

impl PgUserStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }
}
