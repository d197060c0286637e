//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use footprint_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [
        "FOOTPRINT_SERVICE_URL",
        "FOOTPRINT_FEATURE_LIMIT",
        "FOOTPRINT_HEALTH_INTERVAL_SECS",
        "FOOTPRINT_OPACITY",
    ] {
        env::remove_var(key);
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file(
        r#"
feature_limit = 2500
# Only override the limit, leave others as defaults
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.feature_limit.value, 2500);
    assert_eq!(config.feature_limit.source, ConfigSource::File);
    assert_eq!(config.service_url.source, ConfigSource::Default);
    assert_eq!(config.opacity.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/footprint.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let file = config_file("service_url = ");
    let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
service_url = "http://from-file:8000"
opacity = 0.3
"#,
    );

    env::set_var("FOOTPRINT_SERVICE_URL", "http://from-env:8000");

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.service_url.value, "http://from-env:8000");
    assert_eq!(config.service_url.source, ConfigSource::Environment);
    assert_eq!(config.opacity.value, 0.3);
    assert_eq!(config.opacity.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("FOOTPRINT_FEATURE_LIMIT", "lots");
    env::set_var("FOOTPRINT_OPACITY", "2.0");
    env::set_var("FOOTPRINT_HEALTH_INTERVAL_SECS", "soon");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.feature_limit.value, 50_000);
    assert_eq!(config.feature_limit.source, ConfigSource::Default);
    assert_eq!(config.opacity.value, 0.6);
    assert_eq!(config.health_interval_secs.value, 5);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_environment() {
    clear_env();
    env::set_var("FOOTPRINT_FEATURE_LIMIT", "100");
    env::set_var("FOOTPRINT_OPACITY", "0.2");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.feature_limit.value, 100);

    config.update_from_cli(CliConfigOverrides {
        feature_limit: Some(10),
        ..Default::default()
    });

    assert_eq!(config.feature_limit.value, 10);
    assert_eq!(config.feature_limit.source, ConfigSource::Cli);
    assert_eq!(config.opacity.value, 0.2);
    assert_eq!(config.opacity.source, ConfigSource::Environment);

    clear_env();
}
