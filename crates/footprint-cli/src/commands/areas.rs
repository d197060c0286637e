//! Areas command implementation

use crate::cli::AreasArgs;
use crate::output::OutputWriter;
use crate::output_types::AreaRow;
use anyhow::{Context, Result};
use footprint_geo::GeometryExt;
use footprint_view::SelectionModel;

pub fn execute(args: AreasArgs, output: &OutputWriter) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read area file {}", args.file.display()))?;

    let mut model = SelectionModel::new();
    model
        .load_batch(&raw)
        .with_context(|| format!("Invalid area file {}", args.file.display()))?;

    let active = model.active_collection();
    let rows: Vec<AreaRow> = active
        .features
        .iter()
        .map(|feature| AreaRow {
            name: feature.name.clone(),
            geometry_type: format!("{:?}", feature.geometry.geometry_type()),
            polygons: feature.geometry.polygons().len(),
            bounds: feature
                .geometry
                .bounds()
                .map(|[min_x, min_y, max_x, max_y]| {
                    format!("{:.5},{:.5},{:.5},{:.5}", min_x, min_y, max_x, max_y)
                })
                .unwrap_or_default(),
        })
        .collect();

    if !output.is_json() {
        output.section(format!("Areas in {}", args.file.display()));
    }
    output.table(rows);
    Ok(())
}
