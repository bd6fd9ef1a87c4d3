//! One-way password hashing.
//!
//! Hashes are PHC strings produced by Argon2id with a per-password random
//! salt. Verification goes through `argon2`'s constant-time comparison.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};

use crate::config::HashingConfig;

/// Errors produced by a [`PasswordHasher`].
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// The cost parameters were rejected.
    #[error("Invalid hashing parameters: {message}")]
    InvalidParams {
        /// Description from the hashing library.
        message: String,
    },

    /// Hashing itself failed.
    #[error("Failed to hash password: {message}")]
    Hashing {
        /// Description from the hashing library.
        message: String,
    },
}

/// One-way, salted password hasher.
///
/// Implementations are synchronous and CPU-bound; callers on an async
/// executor should move calls onto a blocking thread.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    ///
    /// # Errors
    /// Returns an error if the underlying primitive fails.
    fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// Checks a plaintext password against a stored digest.
    ///
    /// An unparseable digest is a mismatch.
    fn verify(&self, digest: &str, plaintext: &str) -> bool;
}

/// Argon2id hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the given cost parameters.
    ///
    /// # Errors
    /// Returns an error if the parameters are out of range.
    pub fn new(config: &HashingConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| HashError::InvalidParams {
            message: e.to_string(),
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl std::fmt::Debug for Argon2PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError::Hashing {
                message: e.to_string(),
            })
    }

    fn verify(&self, digest: &str, plaintext: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new(&HashingConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap();
        let digest = hasher.hash("secret1").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.verify(&digest, "secret1"));
        assert!(!hasher.verify(&digest, "secret2"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = cheap();
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_digest_does_not_verify() {
        let hasher = cheap();
        assert!(!hasher.verify("", "secret1"));
        assert!(!hasher.verify("not-a-phc-string", "secret1"));
    }

    #[test]
    fn test_default_hasher_verifies_cheap_hash() {
        // Parameters are encoded in the PHC string.
        let digest = cheap().hash("secret1").unwrap();
        assert!(Argon2PasswordHasher::default().verify(&digest, "secret1"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Argon2PasswordHasher::new(&HashingConfig {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        });
        assert!(matches!(result, Err(HashError::InvalidParams { .. })));
    }
}
