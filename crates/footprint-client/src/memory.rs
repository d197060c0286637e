//! In-memory building service for offline use and testing.
//!
//! Buildings are fixed at construction. Health behaviour can be scripted so polling
//! loops can be exercised without a network.

use async_trait::async_trait;
use footprint_core::error::{FootprintError, Result};
use footprint_core::models::{
    BuildingCollection, BuildingFeature, BuildingQuery, BuildingStats, ExportPayload,
    HealthStatus,
};
use footprint_core::ports::BuildingService;
use footprint_geo::stats::{metadata_for, summarize};
use footprint_geo::GeometryExt;
use geo::Intersects;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Release tag reported when none is configured
pub const MEMORY_RELEASE: &str = "in-memory";

/// In-memory implementation of BuildingService
#[derive(Debug, Clone)]
pub struct MemoryBuildingService {
    buildings: Arc<Vec<BuildingFeature>>,
    release: String,
    data_ready: Arc<AtomicBool>,
    /// Health calls still to fail with a transport error
    health_failures: Arc<AtomicUsize>,
    health_calls: Arc<AtomicUsize>,
    query_calls: Arc<AtomicUsize>,
}

impl Default for MemoryBuildingService {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryBuildingService {
    /// Create a ready service holding `buildings`
    pub fn new(buildings: Vec<BuildingFeature>) -> Self {
        Self {
            buildings: Arc::new(buildings),
            release: MEMORY_RELEASE.to_string(),
            data_ready: Arc::new(AtomicBool::new(true)),
            health_failures: Arc::new(AtomicUsize::new(0)),
            health_calls: Arc::new(AtomicUsize::new(0)),
            query_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Load buildings from a GeoJSON FeatureCollection
    pub fn from_geojson(text: &str) -> Result<Self> {
        let (buildings, metadata) = BuildingCollection::parse_response(text)
            .map_err(|e| FootprintError::parse(format!("building fixture: {}", e)))?;

        let mut service = Self::new(buildings);
        if let Some(release) = metadata.map(|m| m.overture_release).filter(|r| !r.is_empty()) {
            service.release = release;
        }

        tracing::debug!(buildings = service.len(), release = %service.release, "Loaded building fixture");
        Ok(service)
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = release.into();
        self
    }

    /// Fail the next `count` health calls with a transport error
    pub fn with_health_failures(self, count: usize) -> Self {
        self.health_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn set_data_ready(&self, ready: bool) {
        self.data_ready.store(ready, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    /// Number of health calls received so far
    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Number of query, stats and export calls received so far
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Buildings intersecting the query geometry, in stored order
    fn matching(&self, query: &BuildingQuery) -> Vec<BuildingFeature> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let area = query.geometry.to_geo();
        self.buildings
            .iter()
            .filter(|building| building.geometry.to_geo().intersects(&area))
            .cloned()
            .collect()
    }
}

fn feature_json(building: &BuildingFeature) -> Result<serde_json::Value> {
    let properties = serde_json::to_value(&building.properties)
        .map_err(|e| FootprintError::Serialization(e.to_string()))?;
    Ok(serde_json::json!({
        "type": "Feature",
        "id": building.id,
        "geometry": building.geometry.to_geojson(),
        "properties": properties,
    }))
}

#[async_trait]
impl BuildingService for MemoryBuildingService {
    async fn health(&self) -> Result<HealthStatus> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .health_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FootprintError::transport("building service unavailable"));
        }

        Ok(HealthStatus {
            data_ready: Some(self.data_ready.load(Ordering::SeqCst)),
            status: Some("ok".to_string()),
            overture_release: Some(self.release.clone()),
        })
    }

    async fn query_buildings(&self, query: &BuildingQuery) -> Result<BuildingCollection> {
        let mut features = self.matching(query);
        let total_matches = features.len();
        features.truncate(query.limit);

        let metadata = metadata_for(&features, total_matches, query.limit, &self.release);
        tracing::debug!(matches = total_matches, returned = features.len(), "Answered building query");

        Ok(BuildingCollection { features, metadata })
    }

    async fn building_stats(&self, query: &BuildingQuery) -> Result<BuildingStats> {
        let mut features = self.matching(query);
        features.truncate(query.limit);
        Ok(summarize(&features))
    }

    async fn export_buildings(&self, query: &BuildingQuery) -> Result<ExportPayload> {
        let mut features = self.matching(query);
        features.truncate(query.limit);

        let document = serde_json::json!({
            "type": "FeatureCollection",
            "features": features.iter().map(feature_json).collect::<Result<Vec<_>>>()?,
        });
        let bytes = serde_json::to_vec(&document)
            .map_err(|e| FootprintError::Serialization(e.to_string()))?;

        Ok(ExportPayload::geojson(bytes))
    }
}
