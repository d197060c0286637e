//! Area of interest from command-line arguments

use crate::cli::AreaArgs;
use crate::interactive;
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use footprint_core::models::{AreaFeature, Position};
use footprint_view::{DrawMode, ExplorerSession};

/// Make the area described by `args` the session's area of interest
pub fn select(session: &mut ExplorerSession, args: &AreaArgs, output: &OutputWriter) -> Result<()> {
    if let Some(bbox) = &args.bbox {
        let [min_x, min_y, max_x, max_y] = parse_bbox(bbox)?;
        let drawn = draw(session, DrawMode::Rectangle, &[[min_x, min_y], [max_x, max_y]])?;
        tracing::debug!(name = %drawn.name, "Selected drawn rectangle");
    } else if let Some(polygon) = &args.polygon {
        let vertices = parse_vertices(polygon)?;
        let drawn = draw(session, DrawMode::Polygon, &vertices)?;
        tracing::debug!(name = %drawn.name, "Selected drawn polygon");
    } else if let Some(path) = &args.area {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read area file {}", path.display()))?;
        let loaded = session
            .upload_area(&raw)
            .with_context(|| format!("Invalid area file {}", path.display()))?;
        tracing::debug!(areas = loaded, "Loaded area file");

        let mut excluded = args.exclude.clone();
        if args.interactive {
            let names: Vec<String> =
                session.selection().names().into_iter().map(str::to_string).collect();
            excluded.extend(interactive::pick_excluded(&names)?);
        }
        for name in &excluded {
            if !session.selection().names().contains(&name.as_str()) {
                output.warning(format!("No area named '{}'", name));
            } else if session.selection().is_selected(name) {
                session.toggle_area(name);
            }
        }
    } else {
        bail!("No area of interest. Use --area <file>, --bbox or --polygon");
    }

    if session.active_area().is_none() {
        bail!("Every area is deselected. Nothing to query");
    }
    Ok(())
}

fn draw(session: &mut ExplorerSession, mode: DrawMode, vertices: &[Position]) -> Result<AreaFeature> {
    session.start_draw(mode);
    for [longitude, latitude] in vertices {
        session.add_vertex(*longitude, *latitude)?;
    }
    session.complete_draw().with_context(|| format!("Could not complete the {}", mode))
}

/// `minx,miny,maxx,maxy`
pub fn parse_bbox(s: &str) -> Result<[f64; 4]> {
    let values = parse_numbers(s, ',')?;
    match values.as_slice() {
        [min_x, min_y, max_x, max_y] => Ok([*min_x, *min_y, *max_x, *max_y]),
        _ => bail!("Invalid bbox '{}': expected minx,miny,maxx,maxy", s),
    }
}

/// `lon,lat`
pub fn parse_position(s: &str) -> Result<Position> {
    let values = parse_numbers(s, ',')?;
    match values.as_slice() {
        [longitude, latitude] => Ok([*longitude, *latitude]),
        _ => bail!("Invalid position '{}': expected lon,lat", s),
    }
}

/// `x y;x y;...`
pub fn parse_vertices(s: &str) -> Result<Vec<Position>> {
    s.split(';')
        .map(str::trim)
        .filter(|vertex| !vertex.is_empty())
        .map(|vertex| {
            let values = vertex
                .split_whitespace()
                .map(|v| v.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Invalid vertex '{}'", vertex))?;
            match values.as_slice() {
                [x, y] => Ok([*x, *y]),
                _ => bail!("Invalid vertex '{}': expected 'x y'", vertex),
            }
        })
        .collect()
}

fn parse_numbers(s: &str, separator: char) -> Result<Vec<f64>> {
    s.split(separator)
        .map(|v| v.trim().parse::<f64>().with_context(|| format!("Invalid number '{}'", v.trim())))
        .collect()
}
