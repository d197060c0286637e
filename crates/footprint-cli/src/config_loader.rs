//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use footprint_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "footprint.toml";

/// Load layered configuration: defaults, file, environment, then CLI flags.
///
/// An explicit `--config` file must exist; the default file is optional.
pub fn load_config(path: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    match path {
        Some(path) => {
            config = config.load_from_file(path).with_context(|| {
                format!("Failed to load configuration file {}", path.display())
            })?;
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                config = config
                    .load_from_file(default_path)
                    .context("Failed to load configuration file footprint.toml")?;
            }
        }
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

/// Overrides carried by the global CLI flags
pub fn overrides_from(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        service_url: cli.service_url.clone(),
        feature_limit: cli.limit,
        opacity: cli.opacity,
    }
}
