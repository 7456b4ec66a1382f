//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use login_server::auth::{
    hash_password, BcryptVerifier, JwtTokenIssuer, LoginAuthenticator, StoreError, UserStore,
};
use login_server::models::{Account, LoginRequest};
use login_server::state::AppState;

pub const ACCESS_SECRET: &str = "test-access-secret";
pub const REFRESH_SECRET: &str = "test-refresh-secret";

/// Accounts held in memory, keyed by email
#[derive(Default)]
pub struct InMemoryUserStore {
    accounts: HashMap<String, Account>,
    lookups: AtomicUsize,
}

impl InMemoryUserStore {
    pub fn with_account(mut self, id: i64, name: &str, email: &str, password: &str) -> Self {
        let account = Account {
            id,
            name: name.to_string(),
            email: email.to_string(),
            // Minimum cost keeps the suite fast
            password_hash: hash_password(password, 4).unwrap(),
        };
        self.accounts.insert(email.to_string(), account);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.get(email).cloned())
    }
}

/// Store whose every lookup fails like a dropped connection
pub struct UnavailableUserStore;

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Store holding the single account `{1, "Ann", "ann@x.com", "secret"}`
pub fn ann_store() -> InMemoryUserStore {
    InMemoryUserStore::default().with_account(1, "Ann", "ann@x.com", "secret")
}

pub fn token_issuer() -> Arc<JwtTokenIssuer> {
    Arc::new(JwtTokenIssuer::new(ACCESS_SECRET, REFRESH_SECRET, 900, 7).unwrap())
}

pub fn authenticator(store: Arc<dyn UserStore>, issuer: Arc<JwtTokenIssuer>) -> LoginAuthenticator {
    LoginAuthenticator::new(store, Arc::new(BcryptVerifier), issuer)
}

pub fn app_state(store: Arc<dyn UserStore>) -> AppState {
    let issuer = token_issuer();
    let authenticator = Arc::new(authenticator(store, issuer.clone()));
    AppState::new(authenticator, issuer, None)
}

pub fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}
