//! Account storage.
//!
//! One row per account in the `users` table. The `password` column holds
//! the PHC-encoded hash, never plaintext.

use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use tracing::instrument;

use crate::{PgPool, StorageError, StorageResult};

// =============================================================================
// Types
// =============================================================================

/// Account record from database.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountRow {
    /// Server-assigned id
    pub id: i64,
    /// Unique email
    pub email: String,
    /// Password hash
    pub password: String,
}

impl AccountRow {
    fn from_tuple(row: (i64, String, String)) -> Self {
        Self {
            id: row.0,
            email: row.1,
            password: row.2,
        }
    }
}

impl std::fmt::Debug for AccountRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Account Storage
// =============================================================================

/// Account storage operations over a borrowed pool.
pub struct AccountStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountStorage<'a> {
    /// Create a new account storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an account and return its id.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the email is taken, or a database error.
    #[instrument(skip(self, password_hash))]
    pub async fn insert(&self, email: &str, password_hash: &str) -> StorageResult<i64> {
        query_scalar(
            r#"
            INSERT INTO users (email, password)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StorageError::conflict(format!(
                    "Account with email '{}' already exists",
                    email
                ));
            }
            StorageError::from(e)
        })
    }

    /// Find an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> StorageResult<Option<AccountRow>> {
        let row: Option<(i64, String, String)> = query_as(
            r#"
            SELECT id, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(AccountRow::from_tuple))
    }

    /// Read only the password hash for an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn find_password_by_email(&self, email: &str) -> StorageResult<Option<String>> {
        let password: Option<String> = query_scalar(
            r#"
            SELECT password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(password)
    }

    /// Delete an account by email, returning the deleted id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn delete_by_email(&self, email: &str) -> StorageResult<Option<i64>> {
        let id: Option<i64> = query_scalar(
            r#"
            DELETE FROM users
            WHERE email = $1
            RETURNING id
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }
}
