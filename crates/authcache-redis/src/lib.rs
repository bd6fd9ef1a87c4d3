//! Redis session cache for authcache.
//!
//! Each account's identity fields are stored as a Redis hash keyed by email.
//! Connections come from a `deadpool-redis` pool.
//!
//! There is no in-process tier in front of Redis: a local copy could not be
//! invalidated when another instance revokes the account.

pub mod session_cache;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use session_cache::RedisSessionCache;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised by the Redis session cache.
#[derive(Debug, thiserror::Error)]
pub enum RedisCacheError {
    /// The pool could not be built from configuration.
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    /// No connection could be checked out of the pool.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// A Redis command failed.
    #[error("Redis command error: {0}")]
    Command(#[from] redis::RedisError),
}

impl From<RedisCacheError> for authcache_auth::AuthError {
    fn from(err: RedisCacheError) -> Self {
        Self::cache(err.to_string())
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Redis connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Use Redis for the session cache. When disabled an in-process cache is
    /// used instead.
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_redis_timeout_ms() -> u64 {
    5000
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

// =============================================================================
// Pool
// =============================================================================

/// Builds a connection pool from configuration.
///
/// No connection is opened here; use [`connect`] to also check that Redis
/// answers.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed.
pub fn create_pool(config: &RedisConfig) -> Result<deadpool_redis::Pool, RedisCacheError> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let mut pool_config = deadpool_redis::PoolConfig::new(config.pool_size);
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    redis_config.pool = Some(pool_config);

    Ok(redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1))?)
}

/// Builds a pool and checks out one connection to verify Redis is reachable.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or Redis does not answer.
pub async fn connect(config: &RedisConfig) -> Result<deadpool_redis::Pool, RedisCacheError> {
    let pool = create_pool(config)?;
    pool.get().await?;
    tracing::info!(url = %config.url, "connected to Redis");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_defaults() {
        let config = RedisConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_create_pool_is_lazy() {
        // Nothing listens here; building the pool must still succeed.
        let config = RedisConfig {
            url: "redis://127.0.0.1:1".to_string(),
            pool_size: 2,
            ..RedisConfig::default()
        };
        let pool = create_pool(&config).expect("pool");
        assert_eq!(pool.status().max_size, 2);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = RedisConfig {
            url: "not a url".to_string(),
            ..RedisConfig::default()
        };
        assert!(matches!(
            create_pool(&config),
            Err(RedisCacheError::CreatePool(_))
        ));
    }

    #[test]
    fn test_error_maps_to_cache_error() {
        let err = RedisCacheError::from(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection refused",
        )));
        let auth: authcache_auth::AuthError = err.into();
        assert!(matches!(auth, authcache_auth::AuthError::Cache { .. }));
    }
}
