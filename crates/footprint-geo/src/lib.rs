//! Footprint Geo - Geometry conversion, validation, and spatial operations
//!
//! This crate bridges the canonical footprint geometry to the `geo` crate and provides
//! the spatial pieces used by the view pipeline: ring validation, drawn-shape builders,
//! the R-tree pick index, and building statistics.

pub mod index;
pub mod models;
pub mod shapes;
pub mod stats;
pub mod validation;

pub use index::PickIndex;
pub use models::{from_geo_geometry, to_geo_geometry, GeometryExt};
pub use validation::{ensure_valid, validate_geometry, ValidationResult};
