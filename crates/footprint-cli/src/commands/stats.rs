//! Stats command implementation

use crate::area;
use crate::cli::StatsArgs;
use crate::output::OutputWriter;
use crate::output_types::StatsOutput;
use crate::progress;
use crate::service;
use anyhow::{Context, Result};
use footprint_core::config::LayeredConfig;
use footprint_core::models::BuildingMetadata;
use footprint_view::{DataSummary, ExplorerSession};
use std::path::Path;

pub async fn execute(
    args: StatsArgs,
    config: &LayeredConfig,
    fixture: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let service = service::connect(config, fixture)?;
    let mut session = ExplorerSession::from_config(config);
    area::select(&mut session, &args.area, output)?;

    let spinner = progress::create_spinner(output, "Computing statistics...");
    let stats = match session.stats(service.as_ref()).await {
        Ok(stats) => stats.context("No area selected")?,
        Err(e) => {
            progress::finish_error(&spinner, "Statistics failed");
            return Err(e).context("Failed to compute building statistics");
        }
    };
    progress::finish_success(&spinner, "Statistics ready");

    let metadata =
        BuildingMetadata::from_stats(stats, false, "").normalized(session.feature_limit());
    let summary = DataSummary::from_metadata(&metadata);
    let area_names: Vec<String> = session
        .active_area()
        .map(|a| a.names().into_iter().map(str::to_string).collect())
        .unwrap_or_default();

    if output.is_json() {
        output.result(StatsOutput { area: area_names, summary })?;
    } else {
        output.section(format!("Area: {}", area_names.join(", ")));
        for line in summary.lines() {
            output.line(line);
        }
    }

    Ok(())
}
