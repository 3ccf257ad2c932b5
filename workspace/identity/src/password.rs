//! Password hashing seam.
//!
//! The account manager never looks inside a hash: it stores whatever
//! [`CredentialHasher::hash`] returns and asks [`CredentialHasher::verify`] later.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

use crate::error::{IdentityError, Result};

/// One-way password hash and its verifier.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into an opaque string.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Check a plaintext password against a value previously returned by [`hash`](Self::hash).
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id hasher producing PHC formatted strings.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| IdentityError::PasswordHash(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
