//! Wiring for the authcache user lookup.
//!
//! Loads [`config::AppConfig`], installs tracing and assembles a
//! [`authcache_auth::UserLookup`] over PostgreSQL and Redis.
//!
//! ```ignore
//! let cfg = authcache_app::config::loader::load_config(None)?;
//! authcache_app::observability::init_tracing_with_level(&cfg.logging.level);
//! let lookup = authcache_app::bootstrap::build_user_lookup(&cfg).await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod observability;

pub use bootstrap::{
    SessionCacheBackend, assemble_user_lookup, build_user_lookup, create_session_cache,
};
pub use config::AppConfig;
