//! Password Hashing and Verification
//!
//! NIST SP 800-63B compliant password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Constant-time comparison (delegated to the argon2 verify routine)
//!
//! Hashing is intentionally slow and CPU-bound; callers on the request
//! path pay that cost only for the password flows, never for API keys.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Securely erased from memory when dropped. Does not implement `Clone`
/// and redacts its `Debug` output.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Validates against NIST SP 800-63B requirements (length in Unicode
    /// code points, no control characters, not whitespace-only). Input is
    /// NFKC-normalized before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized.chars().any(char::is_control) {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Raw bytes for hashing
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword(***)")
    }
}

// ============================================================================
// Hashed Password
// ============================================================================

/// Argon2id password hash in PHC string format
///
/// Safe to persist and to move around; never contains the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hash a clear text password with Argon2id and a random salt
    pub fn from_clear_text(password: &ClearTextPassword) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap an existing PHC string loaded from storage
    pub fn from_phc_string(phc: String) -> Self {
        Self(phc)
    }

    /// Verify a clear text password against this hash
    ///
    /// Returns `Ok(false)` on mismatch; only malformed stored hashes error.
    /// Comparison is constant-time inside the argon2 library.
    pub fn verify(&self, password: &ClearTextPassword) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(&self.0).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::HashingFailed(e.to_string())),
        }
    }

    /// PHC string for storage
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_policy_min_length() {
        let err = ClearTextPassword::new("short".to_string()).unwrap_err();
        assert_eq!(err, PasswordPolicyError::TooShort { min: 8, actual: 5 });
    }

    #[test]
    fn test_policy_max_length() {
        let long = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        let err = ClearTextPassword::new(long).unwrap_err();
        assert!(matches!(err, PasswordPolicyError::TooLong { .. }));
    }

    #[test]
    fn test_policy_whitespace_only() {
        let err = ClearTextPassword::new("        ".to_string()).unwrap_err();
        assert_eq!(err, PasswordPolicyError::EmptyOrWhitespace);
    }

    #[test]
    fn test_policy_control_characters() {
        let err = ClearTextPassword::new("password\u{0000}1".to_string()).unwrap_err();
        assert_eq!(err, PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_nfkc_normalization() {
        // Full-width characters normalize to the same password
        let a = ClearTextPassword::new("ｐａｓｓｗｏｒｄ１".to_string()).unwrap();
        let b = pw("password1");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_hash_and_verify() {
        let password = pw("secret123");
        let hash = HashedPassword::from_clear_text(&password).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hash.verify(&password).unwrap());
        assert!(!hash.verify(&pw("wrong-password")).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = pw("secret123");
        let h1 = HashedPassword::from_clear_text(&password).unwrap();
        let h2 = HashedPassword::from_clear_text(&password).unwrap();
        assert_ne!(h1.as_str(), h2.as_str());
    }

    #[test]
    fn test_verify_invalid_stored_hash() {
        let hash = HashedPassword::from_phc_string("not-a-phc-string".to_string());
        let err = hash.verify(&pw("secret123")).unwrap_err();
        assert!(matches!(err, PasswordHashError::InvalidHashFormat));
    }

    #[test]
    fn test_debug_redacted() {
        let password = pw("secret123");
        assert_eq!(format!("{:?}", password), "ClearTextPassword(***)");
    }
}
