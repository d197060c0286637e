//! Geometry models for footprint-geo.
//!
//! This module re-exports canonical types from `footprint-core` and provides
//! conversions to/from the `geo` crate.

use geo::Geometry as GeoGeometry;

// Re-export canonical types from footprint-core
pub use footprint_core::models::{Geometry, GeometryType, Position, Ring};

fn to_line_string(ring: &[Position]) -> geo::LineString {
    geo::LineString::new(ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect())
}

fn to_geo_polygon(rings: &[Ring]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

fn from_geo_polygon(polygon: &geo::Polygon) -> Vec<Ring> {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(polygon.exterior().coords().map(|c| [c.x, c.y]).collect());
    for interior in polygon.interiors() {
        rings.push(interior.coords().map(|c| [c.x, c.y]).collect());
    }
    rings
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_geo_polygon(coordinates)),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(geo::MultiPolygon::new(
            coordinates.iter().map(|poly| to_geo_polygon(poly)).collect(),
        )),
    }
}

/// Convert a polygonal geo::Geometry to a canonical Geometry.
///
/// Returns `None` for non-polygonal input.
pub fn from_geo_geometry(geom: &GeoGeometry) -> Option<Geometry> {
    match geom {
        GeoGeometry::Polygon(p) => Some(Geometry::Polygon { coordinates: from_geo_polygon(p) }),
        GeoGeometry::MultiPolygon(mp) => Some(Geometry::MultiPolygon {
            coordinates: mp.iter().map(from_geo_polygon).collect(),
        }),
        GeoGeometry::Rect(r) => from_geo_geometry(&GeoGeometry::Polygon(r.to_polygon())),
        GeoGeometry::Triangle(t) => from_geo_geometry(&GeoGeometry::Polygon(t.to_polygon())),
        _ => None,
    }
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Get the centroid as coordinates
    fn centroid_coords(&self) -> Option<[f64; 2]>;

    /// Bounding box as `[min_x, min_y, max_x, max_y]`
    fn bounds(&self) -> Option<[f64; 4]>;

    /// Whether the position lies inside the geometry (boundary excluded)
    fn contains_position(&self, position: Position) -> bool;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }

    fn centroid_coords(&self) -> Option<[f64; 2]> {
        use geo::algorithm::centroid::Centroid;
        self.to_geo().centroid().map(|p| [p.x(), p.y()])
    }

    fn bounds(&self) -> Option<[f64; 4]> {
        use geo::algorithm::bounding_rect::BoundingRect;
        self.to_geo().bounding_rect().map(|r| [r.min().x, r.min().y, r.max().x, r.max().y])
    }

    fn contains_position(&self, position: Position) -> bool {
        use geo::algorithm::contains::Contains;
        self.to_geo().contains(&geo::Point::new(position[0], position[1]))
    }
}
