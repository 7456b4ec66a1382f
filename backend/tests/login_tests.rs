//! Login flow tests
//!
//! Exercise the authenticator end to end with real bcrypt hashes and real
//! JWTs, backed by an in-memory account store.

mod common;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::sync::Arc;

use common::{ann_store, authenticator, login_request, token_issuer, UnavailableUserStore};
use login_server::auth::{
    AccessClaims, AccessToken, LoginError, RefreshClaims, RefreshToken, TokenError, TokenIssuer,
};

/// Decode a token's payload with the given secret
fn payload(token: &str, secret: &str) -> Map<String, Value> {
    decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap()
    .claims
}

/// Payload keys other than the registered time claims
fn identity_keys(payload: &Map<String, Value>) -> Vec<&str> {
    let mut keys: Vec<&str> = payload
        .keys()
        .map(String::as_str)
        .filter(|k| *k != "iat" && *k != "exp")
        .collect();
    keys.sort_unstable();
    keys
}

// ============================================================================
// Successful login
// ============================================================================

#[tokio::test]
async fn test_login_issues_access_and_refresh_tokens() {
    let issuer = token_issuer();
    let authenticator = authenticator(Arc::new(ann_store()), issuer.clone());

    let (access, refresh) = authenticator
        .authenticate(&login_request("ann@x.com", "secret"))
        .await
        .unwrap();

    let access_claims = issuer.verify_access_token(&access.token).unwrap();
    assert_eq!(
        access_claims,
        AccessClaims {
            user_id: 1,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
        }
    );

    let refresh_claims = issuer.verify_refresh_token(&refresh.token).unwrap();
    assert_eq!(refresh_claims, RefreshClaims { user_id: 1 });
}

#[tokio::test]
async fn test_access_claims_are_exactly_identity_and_profile() {
    let authenticator = authenticator(Arc::new(ann_store()), token_issuer());

    let (access, _) = authenticator
        .authenticate(&login_request("ann@x.com", "secret"))
        .await
        .unwrap();

    let claims = payload(&access.token, common::ACCESS_SECRET);
    assert_eq!(identity_keys(&claims), vec!["email", "name", "userID"]);
    assert_eq!(claims["userID"], 1);
    assert_eq!(claims["name"], "Ann");
    assert_eq!(claims["email"], "ann@x.com");
}

#[tokio::test]
async fn test_refresh_claims_never_carry_name_or_email() {
    let authenticator = authenticator(Arc::new(ann_store()), token_issuer());

    let (_, refresh) = authenticator
        .authenticate(&login_request("ann@x.com", "secret"))
        .await
        .unwrap();

    let claims = payload(&refresh.token, common::REFRESH_SECRET);
    assert_eq!(identity_keys(&claims), vec!["userID"]);
    assert!(!claims.contains_key("name"));
    assert!(!claims.contains_key("email"));
}

#[tokio::test]
async fn test_repeated_login_yields_independent_pairs() {
    let store = Arc::new(ann_store());
    let issuer = token_issuer();
    let authenticator = authenticator(store.clone(), issuer.clone());
    let request = login_request("ann@x.com", "secret");

    let (first_access, first_refresh) = authenticator.authenticate(&request).await.unwrap();
    let (second_access, second_refresh) = authenticator.authenticate(&request).await.unwrap();

    // Both pairs stay valid; issuing the second does not consume the first
    for token in [&first_access.token, &second_access.token] {
        assert_eq!(issuer.verify_access_token(token).unwrap().user_id, 1);
    }
    for token in [&first_refresh.token, &second_refresh.token] {
        assert_eq!(issuer.verify_refresh_token(token).unwrap().user_id, 1);
    }

    // One read per call, nothing cached
    assert_eq!(store.lookups(), 2);
}

#[tokio::test]
async fn test_concurrent_logins() {
    let authenticator = Arc::new(authenticator(Arc::new(ann_store()), token_issuer()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let authenticator = authenticator.clone();
            tokio::spawn(async move {
                authenticator
                    .authenticate(&login_request("ann@x.com", "secret"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_unknown_email_is_account_not_found() {
    let authenticator = authenticator(Arc::new(ann_store()), token_issuer());

    for email in ["nobody@x.com", "ANN@x.com", "ann@y.com"] {
        let result = authenticator
            .authenticate(&login_request(email, "secret"))
            .await;
        assert!(
            matches!(result, Err(LoginError::AccountNotFound)),
            "expected AccountNotFound for {}",
            email
        );
    }
}

#[tokio::test]
async fn test_store_failure_is_indistinguishable_from_miss() {
    let authenticator = authenticator(Arc::new(UnavailableUserStore), token_issuer());

    let err = authenticator
        .authenticate(&login_request("ann@x.com", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoginError::AccountNotFound));
    assert_eq!(err.to_string(), LoginError::AccountNotFound.to_string());
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credential() {
    let store = ann_store();
    let authenticator = authenticator(Arc::new(store), token_issuer());

    for password in ["wrong", "Secret", "secret ", "x"] {
        let err = authenticator
            .authenticate(&login_request("ann@x.com", password))
            .await
            .unwrap_err();

        assert!(matches!(err, LoginError::InvalidCredential));
        let rendered = format!("{} {:?}", err, err);
        assert!(!rendered.contains("$2"), "error leaked a hash: {}", rendered);
    }
}

/// Issuer that can be told which token kind to fail
struct BrokenSigner {
    fail_access: bool,
}

impl TokenIssuer for BrokenSigner {
    fn issue_access_token(&self, _: &AccessClaims) -> Result<AccessToken, TokenError> {
        if self.fail_access {
            return Err(TokenError::MissingSecret("access"));
        }
        Ok(AccessToken {
            token: "access".to_string(),
            expires_at: chrono::Utc::now(),
        })
    }

    fn issue_refresh_token(&self, _: &RefreshClaims) -> Result<RefreshToken, TokenError> {
        Err(TokenError::MissingSecret("refresh"))
    }
}

#[tokio::test]
async fn test_signer_failure_is_token_issuance_failed() {
    for fail_access in [true, false] {
        let authenticator = login_server::auth::LoginAuthenticator::new(
            Arc::new(ann_store()),
            Arc::new(login_server::auth::BcryptVerifier),
            Arc::new(BrokenSigner { fail_access }),
        );

        let err = authenticator
            .authenticate(&login_request("ann@x.com", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, LoginError::TokenIssuanceFailed(_)));
        // The underlying cause stays reachable for logging
        assert!(std::error::Error::source(&err).is_some());
    }
}

#[tokio::test]
async fn test_password_checked_before_signing() {
    // A bad password still reports InvalidCredential even when signing is broken
    let authenticator = login_server::auth::LoginAuthenticator::new(
        Arc::new(ann_store()),
        Arc::new(login_server::auth::BcryptVerifier),
        Arc::new(BrokenSigner { fail_access: true }),
    );

    let err = authenticator
        .authenticate(&login_request("ann@x.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, LoginError::InvalidCredential));
}

#[tokio::test]
async fn test_refresh_expiry_past_calendar_fails_login_without_panicking() {
    let issuer = Arc::new(
        login_server::auth::JwtTokenIssuer::new(
            common::ACCESS_SECRET,
            common::REFRESH_SECRET,
            900,
            1_000_000_000,
        )
        .unwrap(),
    );

    let err = authenticator(Arc::new(ann_store()), issuer)
        .authenticate(&login_request("ann@x.com", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LoginError::TokenIssuanceFailed(TokenError::ExpiryOutOfRange)
    ));
}
