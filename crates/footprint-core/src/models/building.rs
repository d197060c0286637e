use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use super::geometry::Geometry;

/// Default number of buildings requested per query
pub const DEFAULT_FEATURE_LIMIT: usize = 50_000;

/// File name offered for exported building data
pub const EXPORT_FILE_NAME: &str = "overture_buildings.geojson";

/// Provenance record of a building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(default = "unknown_dataset")]
    pub dataset: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

fn unknown_dataset() -> String {
    "Unknown".to_string()
}

/// Optional attributes of a building footprint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_floors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facade_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facade_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roof_color: Option<String>,
}

impl BuildingProperties {
    /// Dataset of the first source record, if any
    pub fn primary_source(&self) -> Option<&str> {
        self.sources.as_ref().and_then(|s| s.first()).map(|s| s.dataset.as_str())
    }
}

/// Building footprint returned by the building service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingFeature {
    pub id: String,
    pub geometry: Geometry,
    pub properties: BuildingProperties,
}

impl BuildingFeature {
    /// Convert a GeoJSON feature; `idx` provides the id when neither the feature nor its
    /// properties carry one.
    pub fn from_geojson(feature: &geojson::Feature, idx: usize) -> Result<Self, String> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| format!("building {} has no geometry", idx))
            .and_then(|g| Geometry::try_from(g).map_err(|e| format!("building {}: {}", idx, e)))?;

        let raw_properties = feature.properties.clone().unwrap_or_default();

        let id = feature
            .id
            .as_ref()
            .map(|id| match id {
                geojson::feature::Id::String(s) => s.clone(),
                geojson::feature::Id::Number(n) => n.to_string(),
            })
            .or_else(|| raw_properties.get("id").and_then(JsonValue::as_str).map(str::to_string))
            .unwrap_or_else(|| idx.to_string());

        let properties: BuildingProperties =
            serde_json::from_value(JsonValue::Object(raw_properties))
                .map_err(|e| format!("building {} properties: {}", idx, e))?;

        Ok(Self { id, geometry, properties })
    }
}

/// Coverage and provenance statistics over a building set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingStats {
    pub total_buildings: u64,
    pub height_coverage_pct: f64,
    pub floor_coverage_pct: f64,
    pub class_coverage_pct: f64,
    pub avg_height: Option<f64>,
    #[serde(default)]
    pub source_breakdown: HashMap<String, u64>,
}

/// Summary attached to every building query response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingMetadata {
    pub total_buildings: u64,
    pub truncated: bool,
    pub overture_release: String,
    pub height_coverage_pct: f64,
    pub floor_coverage_pct: f64,
    pub class_coverage_pct: f64,
    pub avg_height: Option<f64>,
    #[serde(default)]
    pub source_breakdown: HashMap<String, u64>,
}

impl BuildingMetadata {
    pub fn from_stats(stats: BuildingStats, truncated: bool, release: impl Into<String>) -> Self {
        Self {
            total_buildings: stats.total_buildings,
            truncated,
            overture_release: release.into(),
            height_coverage_pct: stats.height_coverage_pct,
            floor_coverage_pct: stats.floor_coverage_pct,
            class_coverage_pct: stats.class_coverage_pct,
            avg_height: stats.avg_height,
            source_breakdown: stats.source_breakdown,
        }
    }

    /// Flag truncation whenever the reported total exceeds the requested limit
    pub fn normalized(mut self, limit: usize) -> Self {
        if self.total_buildings > limit as u64 {
            self.truncated = true;
        }
        self
    }
}

/// Request body shared by the query, stats and export endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingQuery {
    pub geometry: Geometry,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_FEATURE_LIMIT
}

impl BuildingQuery {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry, limit: DEFAULT_FEATURE_LIMIT }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Buildings and their summary, as returned by one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingCollection {
    pub features: Vec<BuildingFeature>,
    pub metadata: BuildingMetadata,
}

impl BuildingCollection {
    /// Split a query response into buildings and the optional `metadata` member
    pub fn parse_response(
        body: &str,
    ) -> Result<(Vec<BuildingFeature>, Option<BuildingMetadata>), String> {
        let collection: geojson::FeatureCollection = serde_json::from_str(body)
            .map_err(|e| format!("invalid FeatureCollection: {}", e))?;

        let features = collection
            .features
            .iter()
            .enumerate()
            .map(|(idx, feature)| BuildingFeature::from_geojson(feature, idx))
            .collect::<Result<Vec<_>, _>>()?;

        let metadata = match collection.foreign_members.as_ref().and_then(|fm| fm.get("metadata"))
        {
            Some(value) => Some(
                serde_json::from_value::<BuildingMetadata>(value.clone())
                    .map_err(|e| format!("invalid metadata: {}", e))?,
            ),
            None => None,
        };

        Ok((features, metadata))
    }
}

/// Exported GeoJSON document
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    pub fn geojson(bytes: Vec<u8>) -> Self {
        Self { file_name: EXPORT_FILE_NAME.to_string(), bytes }
    }
}

/// Readiness report of the building service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub data_ready: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub overture_release: Option<String>,
}

impl HealthStatus {
    pub fn ready() -> Self {
        Self { data_ready: Some(true), ..Default::default() }
    }

    pub fn not_ready() -> Self {
        Self { data_ready: Some(false), ..Default::default() }
    }

    /// Explicit `data_ready`, or `status == "ok"` for services that only report status
    pub fn is_ready(&self) -> bool {
        self.data_ready.unwrap_or_else(|| self.status.as_deref() == Some("ok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[36.81, -1.28], [36.82, -1.28], [36.82, -1.27], [36.81, -1.28]]]
                },
                "properties": {
                    "id": "08b7a",
                    "height": 12.5,
                    "class": "residential",
                    "sources": [{"dataset": "OpenStreetMap", "record_id": "w1"}]
                }
            }
        ],
        "metadata": {
            "total_buildings": 75000,
            "truncated": false,
            "overture_release": "2024-11-13.0",
            "height_coverage_pct": 100,
            "floor_coverage_pct": 0,
            "class_coverage_pct": 100,
            "avg_height": 12.5,
            "source_breakdown": {"OpenStreetMap": 1}
        }
    }"#;

    #[test]
    fn test_parse_response() {
        let (features, metadata) = BuildingCollection::parse_response(RESPONSE).unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "08b7a");
        assert_eq!(features[0].properties.height, Some(12.5));
        assert_eq!(features[0].properties.primary_source(), Some("OpenStreetMap"));

        let metadata = metadata.unwrap();
        assert_eq!(metadata.total_buildings, 75_000);
        assert_eq!(metadata.overture_release, "2024-11-13.0");
    }

    #[test]
    fn test_truncation_normalized_against_limit() {
        let (_, metadata) = BuildingCollection::parse_response(RESPONSE).unwrap();
        let metadata = metadata.unwrap().normalized(50_000);
        assert!(metadata.truncated);

        let small = BuildingMetadata { total_buildings: 10, ..Default::default() };
        assert!(!small.normalized(50_000).truncated);
    }

    #[test]
    fn test_source_without_dataset_is_unknown() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]},
                "properties": {"sources": [{"record_id": "w7"}]}
            }]
        }"#;
        let (features, _) = BuildingCollection::parse_response(body).unwrap();
        assert_eq!(features[0].properties.primary_source(), Some("Unknown"));
    }

    #[test]
    fn test_parse_response_without_metadata() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        let (features, metadata) = BuildingCollection::parse_response(body).unwrap();
        assert!(features.is_empty());
        assert!(metadata.is_none());
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(BuildingCollection::parse_response("<html>").is_err());
    }

    #[test]
    fn test_query_default_limit() {
        let geometry = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]);
        let query: BuildingQuery =
            serde_json::from_value(serde_json::json!({ "geometry": geometry.to_geojson() }))
                .unwrap();
        assert_eq!(query.limit, DEFAULT_FEATURE_LIMIT);
        assert_eq!(BuildingQuery::new(geometry).with_limit(5).limit, 5);
    }

    #[test]
    fn test_health_readiness() {
        assert!(HealthStatus::ready().is_ready());
        assert!(!HealthStatus::not_ready().is_ready());

        let legacy: HealthStatus =
            serde_json::from_str(r#"{"status": "ok", "overture_release": "2024-11-13.0"}"#)
                .unwrap();
        assert!(legacy.is_ready());
        assert!(!HealthStatus::default().is_ready());
    }
}
