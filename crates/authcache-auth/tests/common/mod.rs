//! Shared fixtures for lookup integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use authcache_auth::{
    AccountId, Argon2PasswordHasher, AuthError, AuthResult, CacheRecord, CredentialStore,
    HashingConfig, Identity, IdentityClaims, InMemoryCredentialStore, InMemorySessionCache,
    JwtError, JwtTokenIssuer, SessionCache, TokenConfig, TokenIssuer, UserLookup,
};

pub const EMAIL: &str = "a@x.com";
pub const PASSWORD: &str = "secret1";

/// Argon2 parameters cheap enough for tests.
pub fn test_hasher() -> Arc<Argon2PasswordHasher> {
    Arc::new(
        Argon2PasswordHasher::new(&HashingConfig {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid argon2 params"),
    )
}

pub fn test_issuer() -> Arc<JwtTokenIssuer> {
    Arc::new(
        JwtTokenIssuer::new(&TokenConfig {
            secret: "test-secret".to_string(),
            ..TokenConfig::default()
        })
        .expect("valid token config"),
    )
}

// ============================================================================
// Counting store
// ============================================================================

/// Per-method call counts of a [`CountingStore`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreCalls {
    pub insert: usize,
    pub find_by_email: usize,
    pub find_password_hash_by_email: usize,
    pub delete_by_email: usize,
}

/// In-memory store that counts every call, per method.
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemoryCredentialStore,
    pub inserts: AtomicUsize,
    pub account_reads: AtomicUsize,
    pub hash_reads: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        let c = self.per_method();
        c.insert + c.find_by_email + c.find_password_hash_by_email + c.delete_by_email
    }

    pub fn per_method(&self) -> StoreCalls {
        StoreCalls {
            insert: self.inserts.load(Ordering::SeqCst),
            find_by_email: self.account_reads.load(Ordering::SeqCst),
            find_password_hash_by_email: self.hash_reads.load(Ordering::SeqCst),
            delete_by_email: self.deletes.load(Ordering::SeqCst),
        }
    }
}

fn tick(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[async_trait]
impl CredentialStore for CountingStore {
    async fn insert(&self, email: &str, password_hash: &str) -> AuthResult<AccountId> {
        tick(&self.inserts);
        self.inner.insert(email, password_hash).await
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<authcache_auth::Account>> {
        tick(&self.account_reads);
        self.inner.find_by_email(email).await
    }

    async fn find_password_hash_by_email(&self, email: &str) -> AuthResult<Option<String>> {
        tick(&self.hash_reads);
        self.inner.find_password_hash_by_email(email).await
    }

    async fn delete_by_email(&self, email: &str) -> AuthResult<Option<AccountId>> {
        tick(&self.deletes);
        self.inner.delete_by_email(email).await
    }
}

// ============================================================================
// Cache doubles
// ============================================================================

/// Cache wrapper that counts calls and can be told to fail.
#[derive(Default)]
pub struct ScriptedCache {
    pub inner: InMemorySessionCache,
    pub calls: AtomicUsize,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_deletes: bool,
}

impl ScriptedCache {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionCache for ScriptedCache {
    async fn get_fields(&self, email: &str) -> AuthResult<HashMap<String, String>> {
        self.tick();
        if self.fail_reads {
            return Err(AuthError::cache("connection reset"));
        }
        self.inner.get_fields(email).await
    }

    async fn set_fields(
        &self,
        email: &str,
        record: &CacheRecord,
        ttl: Option<Duration>,
    ) -> AuthResult<()> {
        self.tick();
        if self.fail_writes {
            return Err(AuthError::cache("connection reset"));
        }
        self.inner.set_fields(email, record, ttl).await
    }

    async fn delete(&self, email: &str) -> AuthResult<()> {
        self.tick();
        if self.fail_deletes {
            return Err(AuthError::cache("connection reset"));
        }
        self.inner.delete(email).await
    }
}

// ============================================================================
// Token issuer double
// ============================================================================

/// Issuer whose signing always fails.
pub struct BrokenIssuer;

impl TokenIssuer for BrokenIssuer {
    fn issue(&self, _identity: &Identity) -> Result<String, JwtError> {
        Err(JwtError::invalid_key("signing key unavailable"))
    }

    fn verify(&self, _token: &str) -> Result<IdentityClaims, JwtError> {
        Err(JwtError::InvalidSignature)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub store: Arc<CountingStore>,
    pub cache: Arc<ScriptedCache>,
    pub lookup: UserLookup,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_cache(ScriptedCache::default())
    }

    pub fn with_cache(cache: ScriptedCache) -> Self {
        let store = Arc::new(CountingStore::default());
        let cache = Arc::new(cache);
        let lookup = UserLookup::new(store.clone(), cache.clone(), test_hasher(), test_issuer());
        Self {
            store,
            cache,
            lookup,
        }
    }

    pub fn with_issuer(issuer: Arc<dyn TokenIssuer>) -> Self {
        let store = Arc::new(CountingStore::default());
        let cache = Arc::new(ScriptedCache::default());
        let lookup = UserLookup::new(store.clone(), cache.clone(), test_hasher(), issuer);
        Self {
            store,
            cache,
            lookup,
        }
    }

    pub fn map_lookup(mut self, f: impl FnOnce(UserLookup) -> UserLookup) -> Self {
        self.lookup = f(self.lookup);
        self
    }
}
