//! Password hashing and verification

/// Well-formed bcrypt hash at `bcrypt::DEFAULT_COST` that no login password
/// is expected to match. Verified against when no account exists so the
/// miss path costs as much as a real comparison.
pub const DECOY_HASH: &str = "$2y$12$L6Bc/AlTQHyd9liGgGEZyOFLPHNgyxeEPfgYfBCVxJ7JIlwxyVU3u";

/// One-way comparison between a stored hash and a candidate plaintext
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, stored_hash: &str, candidate: &str) -> bool;
}

/// bcrypt-backed verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptVerifier;

impl PasswordVerifier for BcryptVerifier {
    fn verify(&self, stored_hash: &str, candidate: &str) -> bool {
        match bcrypt::verify(candidate, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                // A corrupt hash must never authenticate
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}

/// Hash a plaintext password for storage
pub fn hash_password(plain: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, cost)
}
