//! Password hashing and verification

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AuthError;

/// Hash a plaintext password
///
/// Argon2id with the crate's fixed default cost parameters and a fresh
/// random salt per call: same input, different digest every time.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored digest
///
/// A mismatch is `Ok(false)`, never an error; only a digest that cannot
/// be parsed at all is reported as a failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_round_trip() {
        let digest = hash_password("pw1234").unwrap();
        assert!(verify_password("pw1234", &digest).unwrap());
        assert!(!verify_password("pw12345", &digest).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("pw1234").unwrap();
        let b = hash_password("pw1234").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("pw1234", &a).unwrap());
        assert!(verify_password("pw1234", &b).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        assert!(verify_password("pw1234", "not-a-digest").is_err());
    }
}
