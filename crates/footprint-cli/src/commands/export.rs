//! Export command implementation

use crate::area;
use crate::cli::ExportArgs;
use crate::output::OutputWriter;
use crate::output_types::ExportOutput;
use crate::progress;
use crate::service;
use anyhow::{Context, Result};
use footprint_core::config::LayeredConfig;
use footprint_view::ExplorerSession;
use std::path::{Path, PathBuf};

pub async fn execute(
    args: ExportArgs,
    config: &LayeredConfig,
    fixture: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let service = service::connect(config, fixture)?;
    let mut session = ExplorerSession::from_config(config);
    area::select(&mut session, &args.area, output)?;

    let spinner = progress::create_spinner(output, "Exporting buildings...");
    let payload = match session.export(service.as_ref()).await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            progress::finish_error(&spinner, "Nothing to export");
            anyhow::bail!("No area selected");
        }
        Err(e) => {
            progress::finish_error(&spinner, "Export failed");
            return Err(e).context("Failed to export buildings");
        }
    };

    let path = args.output.unwrap_or_else(|| PathBuf::from(&payload.file_name));
    std::fs::write(&path, &payload.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    progress::finish_success(&spinner, "Export complete");

    let features = count_features(&payload.bytes);
    tracing::info!(path = %path.display(), bytes = payload.bytes.len(), "Saved export");

    if output.is_json() {
        output.result(ExportOutput {
            path: path.display().to_string(),
            bytes: payload.bytes.len(),
            features,
        })?;
    } else {
        match features {
            Some(n) => output.success(format!("Exported {} buildings to {}", n, path.display())),
            None => output.success(format!(
                "Exported {} bytes to {}",
                payload.bytes.len(),
                path.display()
            )),
        }
    }

    Ok(())
}

/// Feature count of an exported FeatureCollection, if it parses as one
fn count_features(bytes: &[u8]) -> Option<usize> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    value.get("features")?.as_array().map(Vec::len)
}
