//! Password hashing using Argon2id (OWASP recommended).

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use contacts_core::{AppError, ResultExt};

/// Hash verified against when the account does not exist, so unknown-email
/// and wrong-password logins cost the same.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("dummy-password-for-timing").ok());

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AppError::Internal` if password hashing fails.
pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .internal("Password hash error")?;

    Ok(hash.to_string())
}

/// Verify a password against its hash.
#[must_use]
pub fn verify(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Burn one verification's worth of work; always fails.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify(password, dummy);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "test_password_123";
        let hash = hash(password).unwrap();

        assert!(verify(password, &hash));
        assert!(!verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_produces_different_results() {
        let password = "same_password";
        let hash1 = hash(password).unwrap();
        let hash2 = hash(password).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify(password, &hash1));
        assert!(verify(password, &hash2));
    }

    #[test]
    fn hash_never_contains_plaintext() {
        let hash = hash("plaintext-secret").unwrap();
        assert!(!hash.contains("plaintext-secret"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify("anything", "not-a-phc-string"));
    }

    #[test]
    fn dummy_verification_always_fails() {
        assert!(!verify_dummy("dummy-password-for-timing"));
    }
}
