use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::geometry::Geometry;

/// Where an area of interest came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AreaSource {
    /// Feature of an uploaded FeatureCollection
    #[default]
    Upload,
    /// Geometry produced by a completed draw interaction
    Drawn,
}

/// Named polygonal area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaFeature {
    /// Display name; also the selection key
    pub name: String,

    pub geometry: Geometry,

    /// Original feature properties, passed through untouched
    #[serde(default)]
    pub properties: Map<String, JsonValue>,

    #[serde(default)]
    pub source: AreaSource,
}

impl AreaFeature {
    pub fn new(name: impl Into<String>, geometry: Geometry, source: AreaSource) -> Self {
        Self { name: name.into(), geometry, properties: Map::new(), source }
    }

    /// Name used for the feature at `index` (0-based) of an upload batch.
    ///
    /// A non-empty string or non-zero number `name` property wins; otherwise the name
    /// is `Feature N`.
    pub fn derive_name(properties: Option<&Map<String, JsonValue>>, index: usize) -> String {
        let name = match properties.and_then(|props| props.get("name")) {
            Some(JsonValue::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(JsonValue::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        };
        name.unwrap_or_else(|| format!("Feature {}", index + 1))
    }

    /// GeoJSON Feature representation
    pub fn to_geojson(&self) -> JsonValue {
        let mut properties = self.properties.clone();
        properties.insert("name".to_string(), JsonValue::String(self.name.clone()));
        serde_json::json!({
            "type": "Feature",
            "geometry": self.geometry.to_geojson(),
            "properties": properties,
        })
    }
}

/// Ordered FeatureCollection of areas
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaCollection {
    pub features: Vec<AreaFeature>,
}

impl AreaCollection {
    pub fn new(features: Vec<AreaFeature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Geometry sent to the building service for this collection
    pub fn query_geometry(&self) -> Option<Geometry> {
        Geometry::union_of(self.features.iter().map(|f| &f.geometry))
    }

    /// GeoJSON FeatureCollection representation
    pub fn to_geojson(&self) -> JsonValue {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(AreaFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}
