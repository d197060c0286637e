//! Builders turning drawn vertices into area geometry.

use crate::models::{from_geo_geometry, Geometry, Position, Ring};

/// Close a vertex list into a polygon.
///
/// A trailing vertex equal to the first is treated as an explicit close. At least three
/// distinct vertices are required, so the resulting ring has at least four positions.
pub fn polygon_from_vertices(vertices: &[Position]) -> Option<Geometry> {
    let mut ring: Ring = Vec::with_capacity(vertices.len() + 1);
    for vertex in vertices {
        // Double clicks and snapping produce repeated vertices
        if ring.last() != Some(vertex) {
            ring.push(*vertex);
        }
    }
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    let mut distinct = ring.clone();
    distinct.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    distinct.dedup();
    if distinct.len() < 3 {
        return None;
    }

    ring.push(ring[0]);
    Some(Geometry::polygon(vec![ring]))
}

/// Axis-aligned rectangle spanned by two opposite corners
pub fn rectangle_from_corners(a: Position, b: Position) -> Option<Geometry> {
    if a[0] == b[0] || a[1] == b[1] {
        return None;
    }
    let rect = geo::Rect::new(geo::Coord { x: a[0], y: a[1] }, geo::Coord { x: b[0], y: b[1] });
    from_geo_geometry(&geo::Geometry::Rect(rect))
}

/// Rectangle from a `[min_x, min_y, max_x, max_y]` bounding box
pub fn rectangle_from_bbox(bbox: [f64; 4]) -> Option<Geometry> {
    rectangle_from_corners([bbox[0], bbox[1]], [bbox[2], bbox[3]])
}
