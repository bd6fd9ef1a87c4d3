//! Cache-aside user lookup.
//!
//! [`UserLookup`] coordinates the credential store, the session cache, the
//! password hasher and the token issuer for register, authenticate, revoke
//! and token verification.
//!
//! # Cache coherence
//!
//! The session cache holds `{id, email}` only. Authenticate populates it
//! after a store read that missed the cache and always re-reads the hash from
//! the store on a hit, so a stale entry can at worst produce `NotFound`.
//! Revoke deletes the store row first and then invalidates the cache.
//!
//! The store is authoritative. Cache read errors count as a miss, and cache
//! write or invalidation errors are logged without failing the call.
//!
//! # Usage
//!
//! ```ignore
//! let lookup = UserLookup::new(store, cache, hasher, tokens)
//!     .with_cache_ttl(Some(Duration::from_secs(900)));
//!
//! let account = lookup.register("a@x.com", "secret1").await?;
//! let session = lookup.authenticate("a@x.com", "secret1").await?;
//! lookup.revoke("a@x.com").await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::AuthResult;
use crate::account::{Account, AccountId, AuthenticatedSession, CacheRecord};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::storage::{CredentialStore, SessionCache};
use crate::token::{Identity, IdentityClaims, JwtError, TokenIssuer};

const EMAIL_MISSING: &str = "Email is missing.";
const PASSWORD_MISSING: &str = "Password is missing.";
const TOKEN_MISSING: &str = "Token is missing.";

/// The user lookup and cache coherence service.
pub struct UserLookup {
    store: Arc<dyn CredentialStore>,
    cache: Arc<dyn SessionCache>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    cache_ttl: Option<Duration>,
    conceal_account_existence: bool,
}

impl UserLookup {
    /// Creates a lookup over the given collaborators.
    ///
    /// Cache entries never expire and unknown accounts are reported as
    /// `NotFound` until configured otherwise.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        cache: Arc<dyn SessionCache>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            store,
            cache,
            hasher,
            tokens,
            cache_ttl: None,
            conceal_account_existence: false,
        }
    }

    /// Sets the expiry applied to cache records.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Reports unknown accounts as invalid credentials on authenticate.
    #[must_use]
    pub fn with_concealed_account_existence(mut self, conceal: bool) -> Self {
        self.conceal_account_existence = conceal;
        self
    }

    /// Applies the cache and disclosure settings from configuration.
    #[must_use]
    pub fn with_config(self, config: &AuthConfig) -> Self {
        self.with_cache_ttl(config.cache.ttl)
            .with_concealed_account_existence(config.conceal_account_existence)
    }

    /// Creates an account.
    ///
    /// The returned account has its password hash cleared. The session cache
    /// is not touched.
    ///
    /// # Errors
    ///
    /// - `Validation` if email or password is blank
    /// - `Conflict` if the email is already registered
    /// - `Storage` if the store fails
    /// - `Internal` if hashing fails
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> AuthResult<Account> {
        require(email, EMAIL_MISSING)?;
        require(password, PASSWORD_MISSING)?;

        let password_hash = self.hash_password(password).await?;
        let id = self.store.insert(email, &password_hash).await?;

        tracing::info!(account_id = %id, "account registered");

        Ok(Account {
            id,
            email: email.to_string(),
            password_hash,
        }
        .redacted())
    }

    /// Checks an email/password pair and issues a token.
    ///
    /// # Errors
    ///
    /// - `Validation` if email or password is blank
    /// - `NotFound` if the account does not exist, or the cache names an
    ///   account the store no longer has
    /// - `InvalidCredentials` if the password does not match
    /// - `Signing` if a token cannot be issued
    /// - `Storage` if the store fails
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<AuthenticatedSession> {
        require(email, EMAIL_MISSING)?;
        require(password, PASSWORD_MISSING)?;

        let (identity, password_hash) = match self.read_cache(email).await {
            Some(record) => {
                tracing::debug!(account_id = %record.id, "session cache hit");
                let hash = self
                    .store
                    .find_password_hash_by_email(email)
                    .await?
                    .ok_or_else(|| {
                        tracing::warn!("cached account is missing from the credential store");
                        self.account_missing()
                    })?;
                let identity = Identity {
                    id: record.id,
                    email: record.email,
                };
                (identity, hash)
            }
            None => {
                tracing::debug!("session cache miss");
                let account = self
                    .store
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| self.account_missing())?;
                self.populate_cache(&account.cache_record()).await;
                let identity = Identity {
                    id: account.id,
                    email: account.email,
                };
                (identity, account.password_hash)
            }
        };

        // Issued before the comparison so a signing failure is reported as
        // such regardless of the password.
        let token = self.tokens.issue(&identity).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            AuthError::signing(e.to_string())
        })?;

        if !self.verify_password(password_hash, password).await? {
            tracing::debug!(account_id = %identity.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AuthenticatedSession {
            id: identity.id,
            email: identity.email,
            token,
        })
    }

    /// Deletes an account and invalidates its cache entry.
    ///
    /// # Errors
    ///
    /// - `Validation` if email is blank
    /// - `NotFound` if no account has this email (the cache is left as is)
    /// - `Storage` if the store fails
    #[instrument(skip(self))]
    pub async fn revoke(&self, email: &str) -> AuthResult<AccountId> {
        require(email, EMAIL_MISSING)?;

        let id = self
            .store
            .delete_by_email(email)
            .await?
            .ok_or_else(AuthError::user_not_found)?;

        if let Err(e) = self.cache.delete(email).await {
            tracing::warn!(error = %e, "failed to invalidate session cache entry");
        }

        tracing::info!(account_id = %id, "account revoked");
        Ok(id)
    }

    /// Verifies a bearer token and returns its claims.
    ///
    /// A leading `Bearer ` is stripped. Store and cache are not consulted.
    ///
    /// # Errors
    ///
    /// - `Validation` if the token is blank
    /// - `TokenExpired` if the token has expired
    /// - `InvalidToken` for any other rejection
    pub fn verify_token(&self, token: &str) -> AuthResult<IdentityClaims> {
        let token = token.trim_start();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        require(token, TOKEN_MISSING)?;

        self.tokens.verify(token).map_err(|e| match e {
            JwtError::Expired => AuthError::TokenExpired,
            other => {
                tracing::debug!(error = %other, "token rejected");
                AuthError::invalid_token(other.to_string())
            }
        })
    }

    async fn read_cache(&self, email: &str) -> Option<CacheRecord> {
        let fields = match self.cache.get_fields(email).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(error = %e, "session cache read failed, falling back to store");
                return None;
            }
        };
        if fields.is_empty() {
            return None;
        }
        let record = CacheRecord::from_fields(&fields, email);
        if record.is_none() {
            tracing::warn!("ignoring malformed session cache entry");
        }
        record
    }

    async fn populate_cache(&self, record: &CacheRecord) {
        if let Err(e) = self
            .cache
            .set_fields(&record.email, record, self.cache_ttl)
            .await
        {
            tracing::warn!(error = %e, "failed to populate session cache");
        }
    }

    fn account_missing(&self) -> AuthError {
        if self.conceal_account_existence {
            AuthError::InvalidCredentials
        } else {
            AuthError::user_not_found()
        }
    }

    async fn hash_password(&self, password: &str) -> AuthResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal(format!("hashing task failed: {e}")))?
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AuthError::internal(e.to_string())
            })
    }

    async fn verify_password(&self, digest: String, password: &str) -> AuthResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .map_err(|e| AuthError::internal(format!("verification task failed: {e}")))
    }
}

impl std::fmt::Debug for UserLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserLookup")
            .field("cache_ttl", &self.cache_ttl)
            .field("conceal_account_existence", &self.conceal_account_existence)
            .finish_non_exhaustive()
    }
}

fn require(value: &str, message: &'static str) -> AuthResult<()> {
    if value.trim().is_empty() {
        return Err(AuthError::validation(message));
    }
    Ok(())
}
