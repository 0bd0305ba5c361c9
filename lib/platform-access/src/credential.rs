//! Credential hashing and verification.
//!
//! Credentials are stored as PHC-format argon2id strings. Verification
//! failures are indistinguishable from unknown accounts at the API surface.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::error::CredentialError;

/// Hashes a raw credential into a PHC-format argon2id string.
pub fn hash_credential(credential: &str) -> Result<String, CredentialError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| CredentialError::HashingFailed {
        details: e.to_string(),
    })?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| CredentialError::HashingFailed {
            details: e.to_string(),
        })?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(credential.as_bytes(), &salt)
        .map_err(|e| CredentialError::HashingFailed {
            details: e.to_string(),
        })?
        .to_string();

    Ok(phc)
}

/// Verifies a raw credential against a stored PHC-format hash.
///
/// An unparseable stored hash verifies as false rather than erroring; the
/// caller cannot act on the distinction without leaking account state.
#[must_use]
pub fn verify_credential(hash: &str, credential: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2
            .verify_password(credential.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_credential("correct horse battery staple").expect("hash");
        assert!(verify_credential(&hash, "correct horse battery staple"));
        assert!(!verify_credential(&hash, "wrong password"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_credential("same password").expect("hash");
        let b = hash_credential("same password").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_credential("not-a-phc-string", "anything"));
        assert!(!verify_credential("", "anything"));
    }
}
