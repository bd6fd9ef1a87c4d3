use authcache_auth::AuthConfig;
use authcache_auth_postgres::PostgresConfig;
use authcache_redis::RedisConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    /// Redis session cache configuration
    #[serde(default)]
    pub redis: RedisConfig,
    /// Token, cache and hashing settings for the lookup
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Storage validation
        let pg = &self.storage.postgres;
        if pg.url.trim().is_empty() {
            return Err("storage.postgres.url must not be empty".into());
        }
        if pg.pool_size == 0 {
            return Err("storage.postgres.pool_size must be > 0".into());
        }
        if pg.connect_timeout_ms == 0 {
            return Err("storage.postgres.connect_timeout_ms must be > 0".into());
        }
        // Redis validation only matters when it is used
        if self.redis.enabled {
            if self.redis.url.trim().is_empty() {
                return Err("redis.enabled=true requires redis.url".into());
            }
            if self.redis.pool_size == 0 {
                return Err("redis.pool_size must be > 0".into());
            }
        }
        self.auth.validate().map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub postgres: PostgresConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    /// Default configuration file looked up in the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "authcache.toml";

    /// Environment variable prefix, e.g. `AUTHCACHE__AUTH__TOKEN__SECRET`.
    pub const ENV_PREFIX: &str = "AUTHCACHE";

    /// Loads `.env` into the process environment if one exists.
    pub fn load_dotenv() {
        if let Err(e) = dotenvy::dotenv()
            && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!(error = %e, "failed to load .env file");
        }
    }

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        load_dotenv();

        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., AUTHCACHE__REDIS__ENABLED=true
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn load_config_with_default_path<P: AsRef<Path>>(
        path: Option<P>,
    ) -> Result<AppConfig, String> {
        let p = path
            .as_ref()
            .map(|p| p.as_ref().to_string_lossy().to_string());
        load_config(p.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.auth.token.secret = "k".into();
        cfg
    }

    #[test]
    fn defaults_need_only_a_secret() {
        assert!(valid().validate().is_ok());
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.contains("auth.token.secret"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut cfg = valid();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }

    #[test]
    fn redis_settings_checked_only_when_enabled() {
        let mut cfg = valid();
        cfg.redis.pool_size = 0;
        assert!(cfg.validate().is_ok());
        cfg.redis.enabled = true;
        assert!(cfg.validate().unwrap_err().contains("redis.pool_size"));
    }

    #[test]
    fn rejects_zero_postgres_pool() {
        let mut cfg = valid();
        cfg.storage.postgres.pool_size = 0;
        assert!(cfg.validate().is_err());
    }
}
