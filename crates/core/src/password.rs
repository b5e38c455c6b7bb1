//! Password hashing for the account store.
//!
//! Credentials are only ever persisted as salted Argon2id hashes; the
//! plaintext never leaves the registration/login call.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasswordError {
    #[error("password cannot be empty")]
    Empty,

    #[error("password hashing failed")]
    HashingFailed,

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Hashes a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `PasswordError::Empty` for an empty password and
/// `PasswordError::HashingFailed` if the hasher rejects the input.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// Verifies a password against a stored hash.
///
/// Returns `false` for a mismatch; comparison happens inside the argon2
/// crate in constant time.
///
/// # Errors
///
/// Returns `PasswordError::MalformedHash` if the stored hash cannot be
/// parsed.
pub fn verify(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::MalformedHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hashed = hash("pw1").unwrap();
        assert_ne!(hashed, "pw1");
        assert!(verify("pw1", &hashed).unwrap());
        assert!(!verify("wrong", &hashed).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash("same password").unwrap();
        let second = hash("same password").unwrap();
        assert_ne!(first, second);
        assert!(verify("same password", &first).unwrap());
        assert!(verify("same password", &second).unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(hash("").unwrap_err(), PasswordError::Empty);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert_eq!(
            verify("pw1", "not-a-phc-string").unwrap_err(),
            PasswordError::MalformedHash
        );
    }
}
