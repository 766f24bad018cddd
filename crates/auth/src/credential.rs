use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash as PhcHash, SaltString};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("failed to generate salt: {0}")]
    Salt(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Password hash in PHC string format (Argon2id).
///
/// Opaque by construction: the plaintext can be verified against it, but the
/// hash itself is never decoded, logged or serialized by this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an existing PHC-format hash, e.g. one loaded from user storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, CredentialError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes).map_err(|e| CredentialError::Salt(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| CredentialError::Salt(e.to_string()))?;
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .to_string();
        Ok(Self(phc))
    }

    /// Check a candidate password against the stored hash.
    ///
    /// Collapses every failure to `false`: a hash that does not parse is
    /// treated exactly like a wrong password, so callers cannot tell a broken
    /// record apart from a bad guess.
    pub fn verify(&self, candidate: &str) -> bool {
        match PhcHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies_against_the_original() {
        let hash = PasswordHash::hash("hunter2").unwrap();
        assert!(hash.verify("hunter2"));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = PasswordHash::hash("hunter2").unwrap();
        assert!(!hash.verify("hunter3"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn unparseable_hash_behaves_like_a_wrong_password() {
        let hash = PasswordHash::from_phc("not-a-phc-string");
        assert!(!hash.verify("anything"));
    }

    #[test]
    fn two_hashes_of_the_same_password_differ() {
        // Fresh salt per hash; equal outputs would mean the salt is not applied.
        let a = PasswordHash::hash("same").unwrap();
        let b = PasswordHash::hash("same").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn debug_output_redacts_hash_material() {
        let hash = PasswordHash::hash("hunter2").unwrap();
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
