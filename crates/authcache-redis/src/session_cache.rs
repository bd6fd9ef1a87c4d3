//! `SessionCache` over Redis hashes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use authcache_auth::{AuthResult, CacheRecord, SessionCache};

use crate::RedisCacheError;

/// Redis-backed session cache.
///
/// Writes go through a `MULTI`/`EXEC` pipeline that drops the old hash, then
/// sets the fields and the expiry, so no stale field survives a write.
#[derive(Clone)]
pub struct RedisSessionCache {
    pool: Pool,
}

impl RedisSessionCache {
    /// Create a session cache over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Check if Redis is reachable (for health checks).
    pub async fn is_available(&self) -> bool {
        self.pool.get().await.is_ok()
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, RedisCacheError> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to get Redis connection");
            RedisCacheError::from(e)
        })
    }
}

impl std::fmt::Debug for RedisSessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionCache")
            .field("status", &self.pool.status())
            .finish()
    }
}

fn expire_seconds(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX)
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get_fields(&self, email: &str) -> AuthResult<HashMap<String, String>> {
        let mut conn = self.connection().await?;
        let fields = conn
            .hgetall::<_, HashMap<String, String>>(email)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis HGETALL error");
                RedisCacheError::from(e)
            })?;

        if fields.is_empty() {
            tracing::debug!("cache miss");
        } else {
            tracing::debug!("cache hit");
        }
        Ok(fields)
    }

    async fn set_fields(
        &self,
        email: &str,
        record: &CacheRecord,
        ttl: Option<Duration>,
    ) -> AuthResult<()> {
        let mut conn = self.connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .del(email)
            .ignore()
            .hset_multiple(email, &record.to_fields())
            .ignore();
        if let Some(ttl) = ttl {
            pipe.expire(email, expire_seconds(ttl)).ignore();
        }

        let _: () = pipe.query_async(&mut conn).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis HSET error");
            RedisCacheError::from(e)
        })?;

        tracing::debug!(ttl_secs = ?ttl.map(|t| t.as_secs()), "cache set");
        Ok(())
    }

    async fn delete(&self, email: &str) -> AuthResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(email).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis DEL error");
            RedisCacheError::from(e)
        })?;
        tracing::debug!("cache invalidated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_seconds() {
        assert_eq!(expire_seconds(Duration::from_secs(900)), 900);
        assert_eq!(expire_seconds(Duration::from_millis(200)), 1);
    }
}
