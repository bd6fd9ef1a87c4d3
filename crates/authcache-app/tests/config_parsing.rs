use std::time::Duration;
use std::{env, fs};

use authcache_app::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("authcache.toml");

    let toml_content = r#"
[storage.postgres]
url = "postgres://app:app@db:5432/app"
pool_size = 4

[redis]
enabled = true
url = "redis://cache:6379"

[auth]
conceal_account_existence = true

[auth.token]
secret = "file-secret"
lifetime = "1h"

[auth.cache]
ttl = "15m"

[auth.hashing]
memory_kib = 4096
iterations = 3
parallelism = 1

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.storage.postgres.pool_size, 4);
    assert_eq!(cfg.storage.postgres.connect_timeout_ms, 5000);
    assert!(cfg.redis.enabled);
    assert_eq!(cfg.redis.url, "redis://cache:6379");
    assert_eq!(cfg.redis.pool_size, 10);
    assert_eq!(cfg.auth.token.secret, "file-secret");
    assert_eq!(cfg.auth.token.issuer, "authcache");
    assert_eq!(cfg.auth.token.lifetime, Duration::from_secs(3600));
    assert_eq!(cfg.auth.cache.ttl, Some(Duration::from_secs(900)));
    assert_eq!(cfg.auth.hashing.iterations, 3);
    assert!(cfg.auth.conceal_account_existence);
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");

    // Secrets stay out of debug output
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("file-secret"));
    assert!(!debug.contains("app:app"));

    // 2) Env override should win over file
    unsafe {
        env::set_var("AUTHCACHE__AUTH__TOKEN__ISSUER", "from-env");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.auth.token.issuer, "from-env");
    // cleanup env var
    unsafe {
        env::remove_var("AUTHCACHE__AUTH__TOKEN__ISSUER");
    }

    // 3) Missing secret should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[storage.postgres]
url = "postgres://localhost/app"

[logging]
level = "info"
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("auth.token.secret"));

    // 4) Bad duration should fail deserialization
    let bad_ttl_path = dir.path().join("bad_ttl.toml");
    let bad_ttl_toml = r#"
[auth.token]
secret = "k"

[auth.cache]
ttl = "soon"
"#;
    fs::write(&bad_ttl_path, bad_ttl_toml).expect("write bad toml");
    let err = load_config(bad_ttl_path.to_str()).expect_err("expected deserialize error");
    assert!(err.contains("deserialize"));
}
