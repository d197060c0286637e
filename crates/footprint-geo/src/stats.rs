//! Coverage statistics over fetched buildings.

use footprint_core::models::{BuildingFeature, BuildingMetadata, BuildingStats};
use std::collections::HashMap;

/// Percentage of `count` in `total`, rounded to a whole number
pub fn coverage_pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0).round()
}

/// Summarize attribute coverage and provenance of a building set.
///
/// Zero heights and floor counts are treated as missing, as are empty class strings.
/// Buildings without a source record are left out of the source breakdown.
pub fn summarize(features: &[BuildingFeature]) -> BuildingStats {
    let total = features.len();

    let heights: Vec<f64> = features
        .iter()
        .filter_map(|f| f.properties.height)
        .filter(|h| *h != 0.0 && h.is_finite())
        .collect();
    let with_floors = features
        .iter()
        .filter(|f| matches!(f.properties.num_floors, Some(n) if n > 0))
        .count();
    let with_class = features
        .iter()
        .filter(|f| f.properties.class.as_deref().is_some_and(|c| !c.is_empty()))
        .count();

    let mut source_breakdown: HashMap<String, u64> = HashMap::new();
    for dataset in features.iter().filter_map(|f| f.properties.primary_source()) {
        *source_breakdown.entry(dataset.to_string()).or_default() += 1;
    }

    let avg_height = if heights.is_empty() {
        None
    } else {
        let mean = heights.iter().sum::<f64>() / heights.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    BuildingStats {
        total_buildings: total as u64,
        height_coverage_pct: coverage_pct(heights.len(), total),
        floor_coverage_pct: coverage_pct(with_floors, total),
        class_coverage_pct: coverage_pct(with_class, total),
        avg_height,
        source_breakdown,
    }
}

/// Metadata for a response holding `features` out of `total_matches` matching buildings.
///
/// Coverage figures describe the returned features; the total reports every match.
pub fn metadata_for(
    features: &[BuildingFeature],
    total_matches: usize,
    limit: usize,
    release: &str,
) -> BuildingMetadata {
    let mut stats = summarize(features);
    stats.total_buildings = total_matches as u64;
    BuildingMetadata::from_stats(stats, total_matches > limit, release).normalized(limit)
}
