use crate::error::{FootprintError, Result};
use crate::models::DEFAULT_FEATURE_LIMIT;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default building service location
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered session configuration
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub service_url: ConfigValue<String>,
    pub feature_limit: ConfigValue<usize>,
    pub health_interval_secs: ConfigValue<u64>,
    pub opacity: ConfigValue<f64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            service_url: ConfigValue::new(DEFAULT_SERVICE_URL.to_string(), ConfigSource::Default),
            feature_limit: ConfigValue::new(DEFAULT_FEATURE_LIMIT, ConfigSource::Default),
            health_interval_secs: ConfigValue::new(5, ConfigSource::Default),
            opacity: ConfigValue::new(0.6, ConfigSource::Default),
        }
    }

    /// Delay between health polls
    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.value)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FootprintError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FootprintError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(service_url) = file_config.service_url {
            self.service_url.update(service_url, ConfigSource::File);
        }

        if let Some(feature_limit) = file_config.feature_limit {
            let limit = parse_feature_limit(&feature_limit.to_string())?;
            self.feature_limit.update(limit, ConfigSource::File);
        }

        if let Some(interval) = file_config.health_interval_secs {
            self.health_interval_secs.update(interval, ConfigSource::File);
        }

        if let Some(opacity) = file_config.opacity {
            let opacity = parse_opacity(&opacity.to_string())?;
            self.opacity.update(opacity, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FOOTPRINT_SERVICE_URL
        if let Ok(url) = env::var("FOOTPRINT_SERVICE_URL") {
            self.service_url.update(url, ConfigSource::Environment);
        }

        // FOOTPRINT_FEATURE_LIMIT
        if let Ok(limit_str) = env::var("FOOTPRINT_FEATURE_LIMIT") {
            match parse_feature_limit(&limit_str) {
                Ok(limit) => self.feature_limit.update(limit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINT_FEATURE_LIMIT value '{}': expected a positive integer",
                    limit_str
                ),
            }
        }

        // FOOTPRINT_HEALTH_INTERVAL_SECS
        if let Ok(interval_str) = env::var("FOOTPRINT_HEALTH_INTERVAL_SECS") {
            match interval_str.parse::<u64>() {
                Ok(interval) => {
                    self.health_interval_secs.update(interval, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINT_HEALTH_INTERVAL_SECS value '{}': expected seconds",
                    interval_str
                ),
            }
        }

        // FOOTPRINT_OPACITY
        if let Ok(opacity_str) = env::var("FOOTPRINT_OPACITY") {
            match parse_opacity(&opacity_str) {
                Ok(opacity) => self.opacity.update(opacity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINT_OPACITY value '{}': expected a number between 0 and 1",
                    opacity_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(service_url) = overrides.service_url {
            self.service_url.update(service_url, ConfigSource::Cli);
        }

        if let Some(feature_limit) = overrides.feature_limit {
            self.feature_limit.update(feature_limit, ConfigSource::Cli);
        }

        if let Some(opacity) = overrides.opacity {
            self.opacity.update(opacity, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "service_url".to_string(),
            (self.service_url.value.clone(), self.service_url.source),
        );

        map.insert(
            "feature_limit".to_string(),
            (self.feature_limit.value.to_string(), self.feature_limit.source),
        );

        map.insert(
            "health_interval".to_string(),
            (format!("{}s", self.health_interval_secs.value), self.health_interval_secs.source),
        );

        map.insert("opacity".to_string(), (self.opacity.value.to_string(), self.opacity.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    service_url: Option<String>,
    feature_limit: Option<i64>,
    health_interval_secs: Option<u64>,
    opacity: Option<f64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub service_url: Option<String>,
    pub feature_limit: Option<usize>,
    pub opacity: Option<f64>,
}

/// Parse a feature limit; zero and negative values are rejected
pub fn parse_feature_limit(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(FootprintError::ConfigInvalid {
            key: "feature_limit".to_string(),
            reason: format!("Invalid feature limit: {}. Use a positive integer", s),
        }),
    }
}

/// Parse an overlay opacity in `[0, 1]`
pub fn parse_opacity(s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(opacity) if (0.0..=1.0).contains(&opacity) => Ok(opacity),
        _ => Err(FootprintError::ConfigInvalid {
            key: "opacity".to_string(),
            reason: format!("Invalid opacity: {}. Use a number between 0 and 1", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.service_url.value, "http://localhost:8000");
        assert_eq!(config.service_url.source, ConfigSource::Default);
        assert_eq!(config.feature_limit.value, 50_000);
        assert_eq!(config.health_interval(), Duration::from_secs(5));
        assert_eq!(config.opacity.value, 0.6);
    }

    #[test]
    fn test_feature_limit_layering() {
        let mut limit = ConfigValue::new(DEFAULT_FEATURE_LIMIT, ConfigSource::Default);

        limit.update(20_000, ConfigSource::Environment);
        limit.update(5_000, ConfigSource::Cli);
        assert_eq!((limit.value, limit.source), (5_000, ConfigSource::Cli));

        // A file read after the CLI flags does not win
        limit.update(1_000, ConfigSource::File);
        assert_eq!((limit.value, limit.source), (5_000, ConfigSource::Cli));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
service_url = "http://buildings.internal:8080"
feature_limit = 1000
health_interval_secs = 2
opacity = 0.8
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.service_url.value, "http://buildings.internal:8080");
        assert_eq!(config.service_url.source, ConfigSource::File);
        assert_eq!(config.feature_limit.value, 1000);
        assert_eq!(config.health_interval_secs.value, 2);
        assert_eq!(config.opacity.value, 0.8);
    }

    #[test]
    fn test_file_rejects_out_of_range_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "opacity = 1.5").unwrap();
        assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "feature_limit = -3").unwrap();
        assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            service_url: Some("http://127.0.0.1:9000".to_string()),
            feature_limit: None,
            opacity: Some(1.0),
        });

        assert_eq!(config.service_url.value, "http://127.0.0.1:9000");
        assert_eq!(config.service_url.source, ConfigSource::Cli);
        assert_eq!(config.opacity.value, 1.0);
        assert_eq!(config.feature_limit.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_opacity() {
        assert_eq!(parse_opacity("0").unwrap(), 0.0);
        assert_eq!(parse_opacity(" 0.6 ").unwrap(), 0.6);
        assert_eq!(parse_opacity("1").unwrap(), 1.0);
        assert!(parse_opacity("1.01").is_err());
        assert!(parse_opacity("opaque").is_err());
    }

    #[test]
    fn test_parse_feature_limit() {
        assert_eq!(parse_feature_limit("50000").unwrap(), 50_000);
        assert!(parse_feature_limit("0").is_err());
        assert!(parse_feature_limit("-1").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let map = LayeredConfig::with_defaults().to_inspection_map();

        assert!(map.contains_key("service_url"));
        assert!(map.contains_key("feature_limit"));
        assert!(map.contains_key("opacity"));

        let (interval, source) = &map["health_interval"];
        assert_eq!(interval, "5s");
        assert_eq!(*source, ConfigSource::Default);
    }
}
