//! Fetch command implementation

use crate::area;
use crate::cli::FetchArgs;
use crate::output::OutputWriter;
use crate::output_types::{BuildingRow, FetchOutput, LayerRow};
use crate::progress;
use crate::service;
use anyhow::{Context, Result};
use footprint_core::config::LayeredConfig;
use footprint_view::{ExplorerSession, LoggingOverlay, PointerEvent, RenderLayer, Rgba};
use std::path::Path;

pub async fn execute(
    args: FetchArgs,
    config: &LayeredConfig,
    fixture: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let service = service::connect(config, fixture)?;
    let mut session = ExplorerSession::from_config(config);
    session.mount_overlay(Box::new(LoggingOverlay::new()));
    area::select(&mut session, &args.area, output)?;

    let area_names: Vec<String> = session
        .active_area()
        .map(|a| a.names().into_iter().map(str::to_string).collect())
        .unwrap_or_default();

    let spinner = progress::create_spinner(output, "Fetching buildings...");
    if let Err(e) = session.fetch(service.as_ref()).await {
        progress::finish_error(&spinner, "Fetch failed");
        return Err(e).context("Failed to fetch buildings");
    }
    let dataset = session.dataset().context("No buildings were committed")?;
    progress::finish_success(&spinner, &format!("Fetched {} buildings", dataset.len()));

    let summary = session.summary().context("No building summary available")?;
    let layers = session.layers();
    session.sync_overlay();

    let tooltip = match &args.pick {
        Some(pick) => {
            let coordinate = area::parse_position(pick)?;
            session.hover(PointerEvent::new(0.0, 0.0, coordinate));
            session.tooltip()
        }
        None => None,
    };

    let layer_rows: Vec<LayerRow> = layers.iter().map(layer_row).collect();
    let buildings = args.features.then(|| {
        dataset
            .features
            .iter()
            .map(|f| BuildingRow {
                id: f.id.clone(),
                name: f.properties.primary_name.clone().unwrap_or_default(),
                height: f.properties.height.map(|h| format!("{}m", h)).unwrap_or_default(),
                class: f.properties.class.clone().unwrap_or_default(),
                source: f.properties.primary_source().unwrap_or_default().to_string(),
            })
            .collect::<Vec<_>>()
    });

    if output.is_json() {
        output.result(FetchOutput {
            area: area_names,
            fetched_at: dataset.fetched_at,
            returned: dataset.len(),
            summary,
            layers: layer_rows,
            tooltip,
            buildings,
        })?;
        return Ok(());
    }

    output.section(format!("Area: {}", area_names.join(", ")));
    for line in summary.lines() {
        output.line(line);
    }
    output.kv("Fetched at", dataset.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"));

    output.section("Layers");
    output.table(layer_rows);

    if let Some(rows) = buildings {
        output.section("Buildings");
        output.table(rows);
    }

    if let Some(pick) = &args.pick {
        output.section(format!("Building at {}", pick));
        match tooltip {
            Some(tooltip) => {
                output.line(&tooltip.title);
                for line in &tooltip.lines {
                    output.line(line);
                }
            }
            None => output.info("No building at this position"),
        }
    }

    Ok(())
}

fn layer_row(layer: &RenderLayer) -> LayerRow {
    LayerRow {
        id: layer.id.to_string(),
        features: layer.data.feature_count(),
        fill: rgba(layer.style.fill),
        line: rgba(layer.style.line),
        pickable: layer.style.pickable,
    }
}

fn rgba([r, g, b, a]: Rgba) -> String {
    format!("rgba({}, {}, {}, {})", r, g, b, a)
}
