use chrono::{DateTime, Utc};
use footprint_view::{DataSummary, Tooltip};
use serde::Serialize;
use tabled::Tabled;

/// Output for health command
#[derive(Debug, Serialize)]
pub struct HealthOutput {
    pub service: String,
    pub data_ready: bool,
    pub overture_release: Option<String>,
    pub attempts: usize,
}

/// One row of the areas listing
#[derive(Debug, Serialize, Tabled)]
pub struct AreaRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Geometry")]
    pub geometry_type: String,
    #[tabled(rename = "Polygons")]
    pub polygons: usize,
    #[tabled(rename = "Bounds")]
    pub bounds: String,
}

/// Output for fetch command
#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub area: Vec<String>,
    pub fetched_at: DateTime<Utc>,
    pub returned: usize,
    pub summary: DataSummary,
    pub layers: Vec<LayerRow>,
    pub tooltip: Option<Tooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buildings: Option<Vec<BuildingRow>>,
}

/// Render layer as composed for the overlay
#[derive(Debug, Serialize, Tabled)]
pub struct LayerRow {
    #[tabled(rename = "Layer")]
    pub id: String,
    #[tabled(rename = "Features")]
    pub features: usize,
    #[tabled(rename = "Fill")]
    pub fill: String,
    #[tabled(rename = "Line")]
    pub line: String,
    #[tabled(rename = "Pickable")]
    pub pickable: bool,
}

/// One fetched building
#[derive(Debug, Serialize, Tabled)]
pub struct BuildingRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Height")]
    pub height: String,
    #[tabled(rename = "Class")]
    pub class: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// Output for export command
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub path: String,
    pub bytes: usize,
    pub features: Option<usize>,
}

/// Output for stats command
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub area: Vec<String>,
    pub summary: DataSummary,
}

/// One row of the configuration listing
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
