//! Durable credential storage.

use async_trait::async_trait;

use crate::AuthResult;
use crate::account::{Account, AccountId};

/// Durable store of `(id, email, password_hash)` rows keyed by email.
///
/// This is the source of truth for account existence.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new account and returns the id the store assigned.
    ///
    /// # Errors
    ///
    /// Returns a `Conflict` error if the email is already registered, or a
    /// `Storage` error if the operation fails.
    async fn insert(&self, email: &str, password_hash: &str) -> AuthResult<AccountId>;

    /// Finds a full account row by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>>;

    /// Reads only the password hash for an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_password_hash_by_email(&self, email: &str) -> AuthResult<Option<String>>;

    /// Deletes the account with this email and returns its id.
    ///
    /// Returns `None` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete_by_email(&self, email: &str) -> AuthResult<Option<AccountId>>;
}
