//! Integration tests for stockroom-config

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use stockroom_config::*;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = StockroomConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("STOCKROOM_API_BASE_URL", Some("https://api.shop.example.com/api")),
        ("STOCKROOM_HTTP_TIMEOUT", Some("5")),
        ("STOCKROOM_ROOT_ORIGIN", Some("https://example.com")),
        ("STOCKROOM_STORAGE_DIR", Some("/tmp/stockroom-test")),
        ("STOCKROOM_LOG_LEVEL", Some("debug")),
        ("STOCKROOM_LOG_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.api.base_url, "https://api.shop.example.com/api");
        assert_eq!(config.http.timeout, Duration::from_secs(5));
        assert_eq!(config.tenancy.root_origin, "https://example.com");
        assert_eq!(config.session.storage_dir, PathBuf::from("/tmp/stockroom-test"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("STOCKROOM_HTTP_TIMEOUT", Some("soon"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("HTTP_TIMEOUT"));
    });
}

#[test]
fn test_env_override_still_validated() {
    with_vars(vec![("STOCKROOM_ROOT_ORIGIN", Some("not-an-origin"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        match err {
            ConfigError::DomainError { domain, .. } => assert_eq!(domain, "tenancy"),
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
fn test_yaml_config_round_trip() {
    let yaml = StockroomConfig::generate_sample();
    let parsed: StockroomConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.session.token_key, "token");
}

#[test]
fn test_partial_yaml_file_with_env_override() {
    let yaml = r#"
api:
  base_url: "http://backend.internal:8080/api"

http:
  timeout: 12
  user_agent: "Stockroom Test"

tenancy:
  root_origin: "https://shop.example.com"
  redirect_on_resolution_failure: true

session:
  admin_role: "ROLE_ADMIN"

logging:
  level: warn
  format: compact
"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(vec![("STOCKROOM_LOG_LEVEL", Some("trace"))], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();

        assert_eq!(config.api.base_url, "http://backend.internal:8080/api");
        assert_eq!(config.http.timeout, Duration::from_secs(12));
        assert_eq!(config.http.max_redirects, 10);
        assert!(config.tenancy.redirect_on_resolution_failure);
        assert_eq!(config.tenancy.login_path, "/login");
        assert_eq!(config.session.admin_role, "ROLE_ADMIN");
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.logging.format, LogFormat::Compact);
    });
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::new()
        .from_file(dir.path().join("absent.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("SHOP_API_BASE_URL", Some("http://127.0.0.1:9000/api"))], || {
        let config = ConfigLoader::with_prefix("SHOP").from_env().unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api");
    });
}
