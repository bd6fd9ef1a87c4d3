//! Configuration for the credential lookup.
//!
//! The types here are deserialized as the `[auth]` section of the
//! application configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! conceal_account_existence = false
//!
//! [auth.token]
//! secret = "change-me"
//! issuer = "authcache"
//! lifetime = "24h"
//!
//! [auth.cache]
//! ttl = "15m"
//!
//! [auth.hashing]
//! memory_kib = 19456
//! iterations = 2
//! parallelism = 1
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors raised while validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required value was missing.
    #[error("Missing configuration value: {field}")]
    Missing {
        /// Dotted path of the missing field.
        field: String,
    },

    /// A value was present but out of range.
    #[error("Invalid configuration value for {field}: {message}")]
    Invalid {
        /// Dotted path of the invalid field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl ConfigError {
    /// Creates a new `Missing` error.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    /// Creates a new `Invalid` error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Root configuration for the lookup service.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Token signing configuration.
    pub token: TokenConfig,

    /// Session cache behaviour.
    pub cache: SessionCacheConfig,

    /// Argon2 cost parameters.
    pub hashing: HashingConfig,

    /// Report unknown accounts as invalid credentials on authenticate.
    ///
    /// Off by default so that callers keep seeing "User not found" for
    /// unknown emails.
    pub conceal_account_existence: bool,
}

impl AuthConfig {
    /// Validates every subsection.
    ///
    /// # Errors
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.validate()?;
        self.cache.validate()?;
        self.hashing.validate()?;
        Ok(())
    }
}

/// HS256 token signing configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Shared HMAC secret. Required.
    pub secret: String,

    /// Value of the `iss` claim.
    pub issuer: String,

    /// How long issued tokens stay valid.
    #[serde(with = "humantime_serde")]
    pub lifetime: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "authcache".to_string(),
            lifetime: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenConfig {
    /// Longest accepted token lifetime.
    pub const MAX_LIFETIME: Duration = Duration::from_secs(366 * 24 * 60 * 60);

    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::missing("auth.token.secret"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::invalid("auth.token.issuer", "must not be empty"));
        }
        if self.lifetime.is_zero() {
            return Err(ConfigError::invalid(
                "auth.token.lifetime",
                "must be greater than zero",
            ));
        }
        if self.lifetime > Self::MAX_LIFETIME {
            return Err(ConfigError::invalid(
                "auth.token.lifetime",
                "must not exceed 366 days",
            ));
        }
        Ok(())
    }
}

/// Session cache behaviour.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionCacheConfig {
    /// Expiry applied to cache records. `None` keeps them until revoke.
    #[serde(with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

impl SessionCacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ttl) = self.ttl
            && ttl.as_secs() == 0
        {
            return Err(ConfigError::invalid(
                "auth.cache.ttl",
                "must be at least one second",
            ));
        }
        Ok(())
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,

    /// Number of passes.
    pub iterations: u32,

    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::invalid(
                "auth.hashing.iterations",
                "must be greater than zero",
            ));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::invalid(
                "auth.hashing.parallelism",
                "must be greater than zero",
            ));
        }
        if self.memory_kib < self.parallelism.saturating_mul(8) {
            return Err(ConfigError::invalid(
                "auth.hashing.memory_kib",
                "must be at least 8 * parallelism",
            ));
        }
        Ok(())
    }
}
