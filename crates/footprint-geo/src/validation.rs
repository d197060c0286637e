use crate::models::{Geometry, Ring};
use footprint_core::error::{FootprintError, Result};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }
}

/// Validate a polygonal geometry
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => {
            let mut result = ValidationResult::valid();
            if coordinates.is_empty() {
                result.add_error("MultiPolygon".to_string(), "MultiPolygon is empty".to_string());
            }
            for (i, polygon) in coordinates.iter().enumerate() {
                result.absorb(&format!("MultiPolygon[{}]", i), validate_polygon(polygon));
            }
            result
        }
    }
}

fn validate_polygon(rings: &[Ring]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let Some((exterior, interiors)) = rings.split_first() else {
        result.add_error("Polygon".to_string(), "Polygon has no exterior ring".to_string());
        return result;
    };

    validate_ring(&mut result, "Polygon exterior", exterior);
    for (i, interior) in interiors.iter().enumerate() {
        validate_ring(&mut result, &format!("Polygon interior[{}]", i), interior);
    }

    result
}

fn validate_ring(result: &mut ValidationResult, location: &str, ring: &Ring) {
    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    for (i, coord) in ring.iter().enumerate() {
        if !coord[0].is_finite() || !coord[1].is_finite() {
            result.add_error(format!("{}[{}]", location, i), "Coordinates must be finite".to_string());
        }
    }
}

/// Reject an invalid geometry, naming the offending feature
pub fn ensure_valid(geometry: &Geometry, feature: &str) -> Result<()> {
    let validation = validate_geometry(geometry);
    if validation.is_valid {
        return Ok(());
    }

    Err(FootprintError::InvalidGeometry {
        feature: feature.to_string(),
        reason: validation
            .errors
            .first()
            .map(|e| format!("{}: {}", e.location, e.reason))
            .unwrap_or_else(|| "Invalid geometry".to_string()),
    })
}
