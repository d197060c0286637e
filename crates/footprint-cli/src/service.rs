//! Building service selection

use anyhow::{Context, Result};
use footprint_client::{HttpBuildingService, MemoryBuildingService};
use footprint_core::config::LayeredConfig;
use footprint_core::ports::BuildingService;
use std::path::Path;
use std::sync::Arc;

/// Offline fixture service when `fixture` is given, the configured HTTP service otherwise
pub fn connect(config: &LayeredConfig, fixture: Option<&Path>) -> Result<Arc<dyn BuildingService>> {
    match fixture {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read building fixture {}", path.display()))?;
            let service = MemoryBuildingService::from_geojson(&text)
                .with_context(|| format!("Invalid building fixture {}", path.display()))?;
            tracing::info!(
                fixture = %path.display(),
                buildings = service.len(),
                "Using in-memory building service"
            );
            Ok(Arc::new(service))
        }
        None => {
            let service = HttpBuildingService::new(&config.service_url.value);
            tracing::debug!(base_url = %service.base_url(), "Using HTTP building service");
            Ok(Arc::new(service))
        }
    }
}
