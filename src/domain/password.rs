//! Password value object.
//!
//! Owns hashing, verification and the strength rule so no plain-text
//! password ever travels further than the service layer.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// A valid Argon2 hash that can never verify; used to equalize the work
/// done for unknown accounts during login.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

/// An Argon2 password hash, compared by value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password after checking the strength rule.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        Self::ensure_strength(plain_text)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Check the strength rule without hashing.
    pub fn ensure_strength(plain_text: &str) -> AppResult<()> {
        if plain_text.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }

    /// Wrap a hash loaded from the database.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// A hash that fails every verification.
    ///
    /// Login verifies against this when no account matches the email, so
    /// the response time does not reveal whether the email exists.
    pub fn dummy() -> Self {
        Self {
            hash: DUMMY_HASH.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain-text candidate against this hash.
    ///
    /// An unparseable stored hash verifies as false rather than erroring;
    /// the caller cannot do anything better with a corrupt row.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("SecurePassword123!").unwrap();

        assert!(password.verify("SecurePassword123!"));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_round_trip_through_storage() {
        let stored = Password::new("TestPassword123").unwrap().into_string();

        assert!(Password::from_hash(stored).verify("TestPassword123"));
    }

    #[test]
    fn test_salting_makes_hashes_unique() {
        let first = Password::new("SamePassword123").unwrap();
        let second = Password::new("SamePassword123").unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("SamePassword123"));
        assert!(second.verify("SamePassword123"));
    }

    #[test]
    fn test_minimum_length_is_inclusive() {
        assert!(Password::new("123456").is_ok());
        assert!(Password::new("12345").is_err());
    }

    #[test]
    fn test_dummy_never_verifies() {
        assert!(!Password::dummy().verify("anything"));
        assert!(!Password::dummy().verify(""));
    }

    #[test]
    fn test_corrupt_hash_verifies_false() {
        assert!(!Password::from_hash("not-a-hash".to_string()).verify("whatever"));
    }
}
