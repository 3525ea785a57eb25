//! Tests for config module

use std::io::Write;

use fairplay::config::Config;
use serial_test::serial;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "FAIRPLAY_API_BASE_URL",
    "FAIRPLAY_ACCESS_TOKEN",
    "SPOTIFY_ACCESS_TOKEN",
    "FAIRPLAY_REQUEST_TIMEOUT",
    "FAIRPLAY_RATE_LIMIT",
    "FAIRPLAY_PASS_INTERVAL",
    "FAIRPLAY_TRIGGER_ON_START",
    "FAIRPLAY_BIND_ADDRESS",
    "FAIRPLAY_LOG_LEVEL",
    "FAIRPLAY_LOG_FORMAT",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_sample_config_loads() {
    let config = Config::from_file(std::path::Path::new("config.toml"))
        .expect("config.toml in the project root should parse");

    assert!(config.validate().is_ok());
    assert_eq!(config.manager.pass_interval_secs, 10);
    assert_eq!(config.server.bind_address.port(), 8088);
}

#[test]
fn test_partial_file_uses_defaults() {
    let file = write_config(
        r#"
[provider]
access_token = "abc"

[manager]
pass_interval_secs = 30
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.provider.access_token, "abc");
    assert_eq!(config.provider.base_url, "https://api.spotify.com");
    assert_eq!(config.manager.pass_interval_secs, 30);
    assert!(!config.manager.trigger_on_start);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_toml_reports_path() {
    let file = write_config("[manager\npass_interval_secs = 1");
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML config file"));
}

#[test]
fn test_missing_file() {
    let err = Config::from_file(std::path::Path::new("does/not/exist.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_validate_rejects_zero_interval() {
    let file = write_config("[manager]\npass_interval_secs = 0\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.provider.request_timeout_secs, 10);
    assert_eq!(config.provider.requests_per_second, 5);
    assert!(config.provider.access_token.is_empty());
    assert_eq!(config.manager.pass_interval_secs, 10);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("FAIRPLAY_API_BASE_URL", "http://localhost:9000");
    std::env::set_var("SPOTIFY_ACCESS_TOKEN", "fallback");
    std::env::set_var("FAIRPLAY_PASS_INTERVAL", "5");
    std::env::set_var("FAIRPLAY_TRIGGER_ON_START", "true");
    std::env::set_var("FAIRPLAY_BIND_ADDRESS", "0.0.0.0:9999");
    std::env::set_var("FAIRPLAY_LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.provider.base_url, "http://localhost:9000");
    assert_eq!(config.provider.access_token, "fallback");
    assert_eq!(config.manager.pass_interval_secs, 5);
    assert!(config.manager.trigger_on_start);
    assert_eq!(config.server.bind_address.port(), 9999);
    assert_eq!(config.logging.format, "json");
}

#[test]
#[serial]
fn test_from_env_rejects_bad_bind_address() {
    clear_env();
    std::env::set_var("FAIRPLAY_BIND_ADDRESS", "not-an-address");

    let result = Config::from_env();
    clear_env();

    assert!(result.is_err());
}
