//! Canonical area geometry shared across all footprint crates.
//!
//! Areas of interest and building footprints are always polygonal, so only the two
//! polygonal GeoJSON geometry types are representable. Conversion to `geo` types lives
//! in `footprint-geo`.

use serde::{Deserialize, Serialize};

/// A single `[longitude, latitude]` position
pub type Position = [f64; 2];

/// Closed ring of positions
pub type Ring = Vec<Position>;

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Polygon,
    MultiPolygon,
}

/// GeoJSON-compatible polygonal geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

impl Geometry {
    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Ring>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// All polygons of this geometry as ring lists
    pub fn polygons(&self) -> Vec<&Vec<Ring>> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates],
            Geometry::MultiPolygon { coordinates } => coordinates.iter().collect(),
        }
    }

    /// Merge several geometries into one.
    ///
    /// A single input is returned unchanged; several inputs are flattened into a
    /// MultiPolygon. Returns `None` for an empty input.
    pub fn union_of<'a, I>(geometries: I) -> Option<Geometry>
    where
        I: IntoIterator<Item = &'a Geometry>,
    {
        let geometries: Vec<&Geometry> = geometries.into_iter().collect();
        match geometries.as_slice() {
            [] => None,
            [single] => Some((*single).clone()),
            many => Some(Geometry::MultiPolygon {
                coordinates: many
                    .iter()
                    .flat_map(|g| g.polygons().into_iter().cloned())
                    .collect(),
            }),
        }
    }

    /// Try to parse from a serde_json::Value (GeoJSON)
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = String;

    fn try_from(geometry: &geojson::Geometry) -> Result<Self, Self::Error> {
        let value = serde_json::to_value(geometry).map_err(|e| e.to_string())?;
        serde_json::from_value(value).map_err(|_| {
            format!("expected Polygon or MultiPolygon, found {}", geometry.value.type_name())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64) -> Vec<Ring> {
        vec![vec![[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
    }

    #[test]
    fn test_polygon_serialization() {
        let polygon = Geometry::polygon(square(0.0));
        let json = serde_json::to_string(&polygon).unwrap();
        assert!(json.contains("\"type\":\"Polygon\""));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(polygon, parsed);
    }

    #[test]
    fn test_point_is_rejected() {
        let value = serde_json::json!({"type": "Point", "coordinates": [1.0, 2.0]});
        assert!(Geometry::from_geojson(&value).is_none());
    }

    #[test]
    fn test_union_of_single_is_identity() {
        let polygon = Geometry::polygon(square(0.0));
        assert_eq!(Geometry::union_of([&polygon]), Some(polygon));
    }

    #[test]
    fn test_union_of_many_flattens() {
        let a = Geometry::polygon(square(0.0));
        let b = Geometry::multi_polygon(vec![square(2.0), square(4.0)]);
        let merged = Geometry::union_of([&a, &b]).unwrap();

        assert_eq!(merged.geometry_type(), GeometryType::MultiPolygon);
        assert_eq!(merged.polygons().len(), 3);
        assert!(Geometry::union_of(std::iter::empty()).is_none());
    }

    #[test]
    fn test_from_geojson_geometry() {
        let geometry: geojson::Geometry = serde_json::from_value(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }))
        .unwrap();
        let converted = Geometry::try_from(&geometry).unwrap();
        assert_eq!(converted.geometry_type(), GeometryType::Polygon);

        let line: geojson::Geometry = serde_json::from_value(serde_json::json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0]]
        }))
        .unwrap();
        let err = Geometry::try_from(&line).unwrap_err();
        assert!(err.contains("LineString"));
    }
}
