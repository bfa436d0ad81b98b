//! Password hashing and verification using Argon2id.
//!
//! Hashing and verification are CPU-bound on purpose, so both run on the
//! blocking thread pool instead of the async workers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::task;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid hasher parameters: {0}")]
    Params(argon2::Error),

    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("invalid password hash format: {0}")]
    Format(argon2::password_hash::Error),

    #[error("hashing task failed: {0}")]
    Task(#[from] task::JoinError),
}

/// Argon2id hasher with a tunable work factor.
///
/// The cost parameters are baked into the PHC hash string, so raising them
/// later only affects new hashes; old ones keep verifying with the
/// parameters they were created with.
#[derive(Debug, Clone)]
pub struct Hasher {
    params: Params,
}

impl Hasher {
    /// Build a hasher from explicit cost parameters.
    ///
    /// # Errors
    /// Returns an error if the parameters are outside the Argon2 bounds.
    pub fn new(memory_cost: u32, iterations: u32, parallelism: u32) -> Result<Self, HashError> {
        let params =
            Params::new(memory_cost, iterations, parallelism, None).map_err(HashError::Params)?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Two calls with the same plaintext return different PHC strings, both
    /// of which verify.
    ///
    /// # Errors
    /// Returns an error if hashing fails or the blocking task is cancelled.
    pub async fn hash(&self, password: SecretString) -> Result<String, HashError> {
        let argon2 = self.argon2();

        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);

            argon2
                .hash_password(password.expose_secret().as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(HashError::Hash)
        })
        .await?
    }

    /// Verify a password against a stored PHC-format hash.
    ///
    /// Salt and cost parameters come from the hash itself; the comparison
    /// inside the argon2 crate is constant-time.
    ///
    /// # Errors
    /// Returns an error if the stored hash cannot be parsed or the blocking
    /// task is cancelled.
    pub async fn verify(&self, password: SecretString, stored: String) -> Result<bool, HashError> {
        let argon2 = self.argon2();

        task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored).map_err(HashError::Format)?;

            Ok(argon2
                .verify_password(password.expose_secret().as_bytes(), &parsed)
                .is_ok())
        })
        .await?
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum legal cost so the tests stay fast
    fn hasher() -> Hasher {
        Hasher::new(8, 1, 1).unwrap()
    }

    fn secret(password: &str) -> SecretString {
        SecretString::from(password.to_string())
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash(secret("correct-horse-battery-staple")).await.unwrap();

        // Hash should be in PHC format
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher
            .verify(secret("correct-horse-battery-staple"), hash.clone())
            .await
            .unwrap());

        assert!(!hasher
            .verify(secret("wrong-password"), hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_different_salts() {
        let hasher = hasher();

        let hash1 = hasher.hash(secret("same-password")).await.unwrap();
        let hash2 = hasher.hash(secret("same-password")).await.unwrap();

        // Same plaintext, different salt, different hash
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(secret("same-password"), hash1).await.unwrap());
        assert!(hasher.verify(secret("same-password"), hash2).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_hash_format() {
        let hasher = hasher();

        let result = hasher.verify(secret("password"), "not-a-valid-hash".to_string()).await;
        assert!(matches!(result, Err(HashError::Format(_))));
    }

    #[test]
    fn test_rejects_out_of_bounds_params() {
        // Argon2 requires at least 8 KiB of memory
        assert!(Hasher::new(1, 1, 1).is_err());
    }
}
