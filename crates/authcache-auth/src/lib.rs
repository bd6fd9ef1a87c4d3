//! Cache-aside credential lookup.
//!
//! This crate holds the account model, the error taxonomy, the collaborator
//! traits and the [`UserLookup`] service that ties them together:
//!
//! - [`storage::CredentialStore`] - durable source of truth for accounts
//! - [`storage::SessionCache`] - volatile `{id, email}` cache keyed by email
//! - [`password::PasswordHasher`] - Argon2id hashing
//! - [`token::TokenIssuer`] - HS256 JWT issuing and verification
//!
//! Password hashes never reach the session cache: the cache only accepts
//! [`CacheRecord`] values, which have no password field.
//!
//! Storage backends live in separate crates:
//!
//! - `authcache-auth-postgres` - PostgreSQL credential store
//! - `authcache-redis` - Redis session cache

pub mod account;
pub mod boundary;
pub mod config;
pub mod error;
pub mod lookup;
pub mod memory;
pub mod password;
pub mod storage;
pub mod token;

pub use account::{Account, AccountId, AuthenticatedSession, CacheRecord};
pub use boundary::{AUTHORIZATION_HEADER, ErrorBody, TokenResponse};
pub use config::{AuthConfig, ConfigError, HashingConfig, SessionCacheConfig, TokenConfig};
pub use error::{AuthError, ErrorCategory, Operation};
pub use lookup::UserLookup;
pub use memory::{InMemoryCredentialStore, InMemorySessionCache, SessionCacheStats};
pub use password::{Argon2PasswordHasher, HashError, PasswordHasher};
pub use storage::{CredentialStore, SessionCache};
pub use token::{Identity, IdentityClaims, JwtError, JwtTokenIssuer, TokenIssuer};

/// Result type for lookup operations.
pub type AuthResult<T> = Result<T, AuthError>;
