//! Integration tests for exchange-config

use exchange_config::*;
use std::fs;
use std::path::PathBuf;
use temp_env::with_vars;
use tempfile::TempDir;

#[test]
fn test_default_config_validation() {
    let config = ExchangeConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("CHANNEL_EXCHANGE_WORKING_DIR", Some("/var/run/worker")),
        ("CHANNEL_EXCHANGE_LOG_LEVEL", Some("debug")),
        ("CHANNEL_EXCHANGE_LOG_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.files.working_dir, PathBuf::from("/var/run/worker"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_invalid_env_override_is_rejected() {
    with_vars(vec![("EXCHANGE_TEST_LOG_LEVEL", Some("chatty"))], || {
        let loader = ConfigLoader::with_prefix("EXCHANGE_TEST");
        match loader.from_env() {
            Err(ConfigError::EnvError(message)) => assert!(message.contains("LOG_LEVEL")),
            other => panic!("expected env error, got {:?}", other),
        }
    });
}

#[test]
fn test_from_file_applies_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("exchange.yaml");
    fs::write(
        &config_path,
        r#"
files:
  working_dir: /data/in
  declared_outputs: outputs.json
logging:
  level: info
  format: compact
"#,
    )
    .unwrap();

    with_vars(vec![("EXCHANGE_FILE_TEST_LOG_LEVEL", Some("trace"))], || {
        let loader = ConfigLoader::with_prefix("EXCHANGE_FILE_TEST");
        let config = loader.load(Some(&config_path)).unwrap();

        assert_eq!(config.files.working_dir, PathBuf::from("/data/in"));
        assert_eq!(config.files.declared_outputs, "outputs.json");
        assert_eq!(config.files.input_values, "pythonInput.rced");
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.logging.format, LogFormat::Compact);
    });
}

#[test]
fn test_from_file_rejects_clashing_layout() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("exchange.yaml");
    fs::write(
        &config_path,
        r#"
files:
  output_values: pythonInput.rced
"#,
    )
    .unwrap();

    let result = ConfigLoader::with_prefix("EXCHANGE_CLASH_TEST").from_file(&config_path);
    assert!(matches!(result, Err(ConfigError::DomainError { .. })));
}

#[test]
fn test_missing_file_is_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::new().from_file(temp_dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::FileReadError(_))));
}
