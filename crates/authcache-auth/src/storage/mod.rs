//! Collaborator traits for durable and volatile account data.
//!
//! # Implementations
//!
//! - [`crate::memory`] - in-process backends used by tests and local runs
//! - `authcache-auth-postgres` - PostgreSQL credential store
//! - `authcache-redis` - Redis session cache

pub mod credential;
pub mod session_cache;

pub use credential::CredentialStore;
pub use session_cache::SessionCache;
