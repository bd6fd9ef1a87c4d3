//! Volatile session cache.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::AuthResult;
use crate::account::CacheRecord;

/// Volatile key-value cache mapping an email to its identity fields.
///
/// Only [`CacheRecord`] values can be written, so no password material ever
/// reaches an implementation.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Returns every field stored under `email`, or an empty map on a miss.
    ///
    /// # Errors
    ///
    /// Returns a `Cache` error if the backend fails.
    async fn get_fields(&self, email: &str) -> AuthResult<HashMap<String, String>>;

    /// Stores the record's fields under `email`, optionally with an expiry.
    ///
    /// Any existing entry for `email` is replaced, not merged.
    ///
    /// # Errors
    ///
    /// Returns a `Cache` error if the backend fails.
    async fn set_fields(
        &self,
        email: &str,
        record: &CacheRecord,
        ttl: Option<Duration>,
    ) -> AuthResult<()>;

    /// Removes the entry for `email`. Removing a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns a `Cache` error if the backend fails.
    async fn delete(&self, email: &str) -> AuthResult<()>;
}
