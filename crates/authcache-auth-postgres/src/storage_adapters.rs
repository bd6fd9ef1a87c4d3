//! Arc-owning storage adapter.
//!
//! Wraps the lifetime-based [`AccountStorage`] and owns an `Arc<PgPool>`, so
//! it can be handed to the lookup service as `Arc<dyn CredentialStore>`.

use std::sync::Arc;

use async_trait::async_trait;

use authcache_auth::{Account, AccountId, AuthError, AuthResult, CredentialStore};

use crate::account::{AccountRow, AccountStorage};
use crate::{PgPool, StorageError};

fn map_error(err: StorageError) -> AuthError {
    match err {
        StorageError::Conflict(message) => AuthError::conflict(message),
        StorageError::Database(e) => {
            tracing::error!(error = %e, "credential store query failed");
            AuthError::storage(e.to_string())
        }
    }
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId(row.id),
            email: row.email,
            password_hash: row.password,
        }
    }
}

/// Arc-owning PostgreSQL credential store.
#[derive(Debug, Clone)]
pub struct ArcCredentialStore {
    pool: Arc<PgPool>,
}

impl ArcCredentialStore {
    /// Create a new Arc-owning credential store.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for ArcCredentialStore {
    async fn insert(&self, email: &str, password_hash: &str) -> AuthResult<AccountId> {
        let storage = AccountStorage::new(&self.pool);
        storage
            .insert(email, password_hash)
            .await
            .map(AccountId)
            .map_err(map_error)
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let storage = AccountStorage::new(&self.pool);
        storage
            .find_by_email(email)
            .await
            .map(|row| row.map(Account::from))
            .map_err(map_error)
    }

    async fn find_password_hash_by_email(&self, email: &str) -> AuthResult<Option<String>> {
        let storage = AccountStorage::new(&self.pool);
        storage
            .find_password_by_email(email)
            .await
            .map_err(map_error)
    }

    async fn delete_by_email(&self, email: &str) -> AuthResult<Option<AccountId>> {
        let storage = AccountStorage::new(&self.pool);
        storage
            .delete_by_email(email)
            .await
            .map(|id| id.map(AccountId))
            .map_err(map_error)
    }
}
