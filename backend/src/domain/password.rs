//! Password hashing and verification.
//!
//! Digests use Argon2id in PHC string format. Verification never reports why
//! a comparison failed; callers collapse every failure into the same
//! unauthorized response so account enumeration stays impossible.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::warn;

use super::user::PasswordHash;

/// Failure raised when a digest cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Hash a plaintext password with a freshly generated salt.
pub fn hash(password: &str) -> Result<PasswordHash, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| PasswordHashError {
            message: err.to_string(),
        })?;
    Ok(PasswordHash::new(digest.to_string()))
}

/// Check a plaintext password against a stored digest.
///
/// A digest that fails to parse is treated as a mismatch; it is logged
/// because it indicates corrupted stored state, not a bad login attempt.
#[must_use]
pub fn verify(password: &str, stored: &PasswordHash) -> bool {
    let parsed = match PhcHash::new(stored.as_str()) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!(%error, "stored password digest failed to parse");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
