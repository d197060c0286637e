pub mod area;
pub mod building;
pub mod geometry;
pub mod view;

pub use area::{AreaCollection, AreaFeature, AreaSource};
pub use building::{
    BuildingCollection, BuildingFeature, BuildingMetadata, BuildingProperties, BuildingQuery,
    BuildingStats, ExportPayload, HealthStatus, SourceRecord, DEFAULT_FEATURE_LIMIT,
    EXPORT_FILE_NAME,
};
pub use geometry::{Geometry, GeometryType, Position, Ring};
pub use view::{ViewState, ViewStateUpdate};
