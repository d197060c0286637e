use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BuildingCollection, BuildingQuery, BuildingStats, ExportPayload, HealthStatus};

/// Port for the remote building-footprint service
#[async_trait]
pub trait BuildingService: Send + Sync {
    /// Report whether the service has its building data loaded
    async fn health(&self) -> Result<HealthStatus>;

    /// Fetch the buildings intersecting the query geometry, with summary metadata
    async fn query_buildings(&self, query: &BuildingQuery) -> Result<BuildingCollection>;

    /// Compute coverage statistics without transferring geometry
    async fn building_stats(&self, query: &BuildingQuery) -> Result<BuildingStats>;

    /// Export the matching buildings as a GeoJSON document
    async fn export_buildings(&self, query: &BuildingQuery) -> Result<ExportPayload>;
}
