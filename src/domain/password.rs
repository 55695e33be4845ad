//! Password value object.
//!
//! Encapsulates strength rules and Argon2 hashing/verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult, FieldErrors};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a validation error on the `password` field listing every
    /// strength rule the plain text breaks.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let mut errors = FieldErrors::new();
        for message in Self::strength_violations(plain_text) {
            errors.add("password", message);
        }
        errors.into_result()?;

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Rules: minimum length, at least one digit, one lowercase and one
    /// uppercase letter.
    pub fn strength_violations(plain_text: &str) -> Vec<String> {
        let mut violations = Vec::new();
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            violations.push(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LENGTH
            ));
        }
        if !plain_text.chars().any(|c| c.is_ascii_digit()) {
            violations.push("Password must contain at least one digit.".to_string());
        }
        if !plain_text.chars().any(|c| c.is_lowercase()) {
            violations.push("Password must contain at least one lowercase letter.".to_string());
        }
        if !plain_text.chars().any(|c| c.is_uppercase()) {
            violations.push("Password must contain at least one uppercase letter.".to_string());
        }
        violations
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
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
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_password_too_short() {
        let err = Password::new("Ab1").unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.messages("password").len(), 1);
    }

    #[test]
    fn test_password_requires_character_classes() {
        assert_eq!(Password::strength_violations("alllowercase").len(), 2);
        assert_eq!(Password::strength_violations("ALLUPPER12").len(), 1);
        assert_eq!(Password::strength_violations("NoDigitsHere").len(), 1);
        assert!(Password::strength_violations("Abcdefg1").is_empty());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("anything"));
    }
}
