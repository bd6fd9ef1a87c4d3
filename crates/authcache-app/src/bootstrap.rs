//! Builds a [`UserLookup`] from configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use authcache_auth::{
    Argon2PasswordHasher, AuthResult, CacheRecord, CredentialStore, InMemorySessionCache,
    JwtTokenIssuer, SessionCache, UserLookup,
};
use authcache_auth_postgres::PostgresCredentialStorage;
use authcache_redis::{RedisConfig, RedisSessionCache};

use crate::config::AppConfig;

/// Session cache selected at startup.
///
/// - **Local**: in-process cache, for single-instance deployments
/// - **Redis**: shared cache across instances
#[derive(Debug, Clone)]
pub enum SessionCacheBackend {
    Local(InMemorySessionCache),
    Redis(RedisSessionCache),
}

impl SessionCacheBackend {
    /// Short name of the active backend.
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            SessionCacheBackend::Local(_) => "local",
            SessionCacheBackend::Redis(_) => "redis",
        }
    }
}

#[async_trait]
impl SessionCache for SessionCacheBackend {
    async fn get_fields(&self, email: &str) -> AuthResult<HashMap<String, String>> {
        match self {
            SessionCacheBackend::Local(cache) => cache.get_fields(email).await,
            SessionCacheBackend::Redis(cache) => cache.get_fields(email).await,
        }
    }

    async fn set_fields(
        &self,
        email: &str,
        record: &CacheRecord,
        ttl: Option<Duration>,
    ) -> AuthResult<()> {
        match self {
            SessionCacheBackend::Local(cache) => cache.set_fields(email, record, ttl).await,
            SessionCacheBackend::Redis(cache) => cache.set_fields(email, record, ttl).await,
        }
    }

    async fn delete(&self, email: &str) -> AuthResult<()> {
        match self {
            SessionCacheBackend::Local(cache) => cache.delete(email).await,
            SessionCacheBackend::Redis(cache) => cache.delete(email).await,
        }
    }
}

/// Creates the session cache, falling back to the local cache when Redis is
/// disabled or unreachable.
pub async fn create_session_cache(config: &RedisConfig) -> SessionCacheBackend {
    if !config.enabled {
        tracing::info!("Redis disabled, using local session cache");
        return SessionCacheBackend::Local(InMemorySessionCache::new());
    }

    tracing::info!(url = %config.url, "Connecting to Redis");

    match authcache_redis::connect(config).await {
        Ok(pool) => SessionCacheBackend::Redis(RedisSessionCache::new(pool)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to connect to Redis. Falling back to local session cache."
            );
            SessionCacheBackend::Local(InMemorySessionCache::new())
        }
    }
}

/// Builds the hasher and token issuer from configuration and assembles the
/// lookup over the given store and cache.
///
/// # Errors
///
/// Returns an error if the hashing parameters or token settings are invalid.
pub fn assemble_user_lookup(
    config: &AppConfig,
    store: Arc<dyn CredentialStore>,
    cache: Arc<dyn SessionCache>,
) -> anyhow::Result<UserLookup> {
    let hasher = Argon2PasswordHasher::new(&config.auth.hashing)
        .context("invalid auth.hashing parameters")?;
    let tokens = JwtTokenIssuer::new(&config.auth.token).context("invalid auth.token settings")?;

    Ok(UserLookup::new(store, cache, Arc::new(hasher), Arc::new(tokens)).with_config(&config.auth))
}

/// Connects to PostgreSQL, prepares the schema, picks a session cache and
/// returns a ready [`UserLookup`].
///
/// # Errors
///
/// Returns an error if PostgreSQL is unreachable, the schema cannot be
/// created, or the auth settings are invalid.
pub async fn build_user_lookup(config: &AppConfig) -> anyhow::Result<UserLookup> {
    let storage = PostgresCredentialStorage::connect_with(&config.storage.postgres)
        .await
        .context("failed to connect to PostgreSQL")?;
    storage
        .ensure_schema()
        .await
        .context("failed to create users table")?;

    let cache = create_session_cache(&config.redis).await;
    tracing::info!(mode = cache.mode(), "session cache ready");

    assemble_user_lookup(config, Arc::new(storage.credential_store()), Arc::new(cache))
}
