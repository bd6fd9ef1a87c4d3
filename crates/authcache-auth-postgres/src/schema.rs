//! Table bootstrap for the credential store.

use sqlx_core::query::query;

use crate::{PgPool, StorageResult};

/// DDL for the `users` table.
pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL
    )
"#;

/// Creates the `users` table if it is missing. Safe to call repeatedly.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub async fn ensure_schema(pool: &PgPool) -> StorageResult<()> {
    query(CREATE_USERS_TABLE).execute(pool).await?;
    tracing::debug!("users table ready");
    Ok(())
}
