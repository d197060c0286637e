use footprint_core::models::BuildingMetadata;
use footprint_geo::stats::coverage_pct;
use serde::Serialize;

/// Share of one source dataset in the result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceShare {
    pub dataset: String,
    pub count: u64,
    /// Whole-number percentage of all buildings
    pub pct: f64,
}

/// Display model of the result panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub total_buildings: u64,
    pub truncated: bool,
    pub avg_height: Option<f64>,
    pub height_coverage_pct: f64,
    pub floor_coverage_pct: f64,
    pub class_coverage_pct: f64,
    /// Sorted by count, largest first
    pub sources: Vec<SourceShare>,
    pub overture_release: String,
}

impl DataSummary {
    pub fn from_metadata(metadata: &BuildingMetadata) -> Self {
        let total = metadata.total_buildings;
        let mut sources: Vec<SourceShare> = metadata
            .source_breakdown
            .iter()
            .map(|(dataset, count)| SourceShare {
                dataset: dataset.clone(),
                count: *count,
                pct: coverage_pct(*count as usize, total as usize),
            })
            .collect();
        sources.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.dataset.cmp(&b.dataset)));

        Self {
            total_buildings: total,
            truncated: metadata.truncated,
            avg_height: metadata.avg_height,
            height_coverage_pct: metadata.height_coverage_pct,
            floor_coverage_pct: metadata.floor_coverage_pct,
            class_coverage_pct: metadata.class_coverage_pct,
            sources,
            overture_release: metadata.overture_release.clone(),
        }
    }

    pub fn headline(&self) -> String {
        format!("{} Buildings", group_thousands(self.total_buildings))
    }

    /// Panel text, one entry per line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.headline()];
        if self.truncated {
            lines.push("Display limit reached".to_string());
        }
        if let Some(avg) = self.avg_height {
            lines.push(format!("Height: {}m avg ({}% coverage)", avg, self.height_coverage_pct));
        }
        lines.push(format!("Floors: {}% coverage", self.floor_coverage_pct));
        lines.push(format!("Classes: {}% coverage", self.class_coverage_pct));

        if !self.sources.is_empty() {
            lines.push("Sources".to_string());
            for share in &self.sources {
                lines.push(format!("  {}: {}%", share.dataset, share.pct));
            }
        }
        if !self.overture_release.is_empty() {
            lines.push(format!("Overture {}", self.overture_release));
        }
        lines
    }
}

/// `75000` -> `75,000`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
