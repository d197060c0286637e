//! Command implementations

mod areas;
mod config;
mod export;
mod fetch;
mod health;
mod stats;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = config_loader::load_config(cli.config.as_deref(), config_loader::overrides_from(&cli))?;
    let fixture = cli.fixture.as_deref();

    match cli.command {
        Commands::Health(args) => health::execute(args, &config, fixture, &output).await,
        Commands::Areas(args) => areas::execute(args, &output),
        Commands::Fetch(args) => fetch::execute(args, &config, fixture, &output).await,
        Commands::Export(args) => export::execute(args, &config, fixture, &output).await,
        Commands::Stats(args) => stats::execute(args, &config, fixture, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}
