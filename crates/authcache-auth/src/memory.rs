//! In-process backends for the credential store and session cache.
//!
//! Both are backed by `DashMap` and are safe to share across tasks. They are
//! used by the test suites and as the session cache when Redis is disabled.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::AuthResult;
use crate::account::{Account, AccountId, CacheRecord};
use crate::error::AuthError;
use crate::storage::{CredentialStore, SessionCache};

// ============================================================================
// Credential store
// ============================================================================

/// Credential store held in memory, keyed by email.
#[derive(Debug)]
pub struct InMemoryCredentialStore {
    rows: DashMap<String, Account>,
    next_id: AtomicI64,
}

impl InMemoryCredentialStore {
    /// Creates an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no accounts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, email: &str, password_hash: &str) -> AuthResult<AccountId> {
        match self.rows.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::conflict(format!(
                "Account with email {email} already exists"
            ))),
            Entry::Vacant(slot) => {
                let id = AccountId(self.next_id.fetch_add(1, Ordering::Relaxed));
                slot.insert(Account {
                    id,
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                });
                Ok(id)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        Ok(self.rows.get(email).map(|row| row.value().clone()))
    }

    async fn find_password_hash_by_email(&self, email: &str) -> AuthResult<Option<String>> {
        Ok(self.rows.get(email).map(|row| row.password_hash.clone()))
    }

    async fn delete_by_email(&self, email: &str) -> AuthResult<Option<AccountId>> {
        Ok(self.rows.remove(email).map(|(_, account)| account.id))
    }
}

// ============================================================================
// Session cache
// ============================================================================

#[derive(Debug, Clone)]
struct CachedFields {
    fields: HashMap<String, String>,
    cached_at: Instant,
    ttl: Option<Duration>,
}

impl CachedFields {
    fn is_expired(&self) -> bool {
        self.ttl.is_some_and(|ttl| self.cached_at.elapsed() >= ttl)
    }
}

/// Hit/miss counters for [`InMemorySessionCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Session cache held in memory.
///
/// Expired entries are dropped lazily on read.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionCache {
    entries: Arc<DashMap<String, CachedFields>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl InMemorySessionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> SessionCacheStats {
        SessionCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Returns `true` if a live entry exists for `email`.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.entries
            .get(email)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Writes raw fields, bypassing [`CacheRecord`].
    ///
    /// Lets callers seed entries a well-behaved writer would never produce,
    /// such as stale or malformed records.
    pub fn insert_raw(&self, email: &str, fields: HashMap<String, String>) {
        self.entries.insert(
            email.to_string(),
            CachedFields {
                fields,
                cached_at: Instant::now(),
                ttl: None,
            },
        );
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get_fields(&self, email: &str) -> AuthResult<HashMap<String, String>> {
        if let Some(entry) = self.entries.get(email) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(entry.fields.clone());
            }
            drop(entry);
            self.entries.remove(email);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(HashMap::new())
    }

    async fn set_fields(
        &self,
        email: &str,
        record: &CacheRecord,
        ttl: Option<Duration>,
    ) -> AuthResult<()> {
        let fields = record
            .to_fields()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        self.entries.insert(
            email.to_string(),
            CachedFields {
                fields,
                cached_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, email: &str) -> AuthResult<()> {
        self.entries.remove(email);
        Ok(())
    }
}
