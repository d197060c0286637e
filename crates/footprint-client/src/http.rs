use async_trait::async_trait;
use footprint_core::config::DEFAULT_SERVICE_URL;
use footprint_core::error::{FootprintError, Result};
use footprint_core::models::{
    BuildingCollection, BuildingQuery, BuildingStats, ExportPayload, HealthStatus,
};
use footprint_core::ports::BuildingService;
use footprint_geo::stats::metadata_for;

/// HTTP adapter of the building service
#[derive(Debug, Clone)]
pub struct HttpBuildingService {
    /// Base URL of the service (e.g., "http://localhost:8000")
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpBuildingService {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(), client: reqwest::Client::new() }
    }

    /// Create with default localhost URL
    pub fn localhost() -> Self {
        Self::new(DEFAULT_SERVICE_URL)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST the query and return the successful response
    async fn post_query(&self, path: &str, query: &BuildingQuery) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, limit = query.limit, "Posting building query");

        let response = self.client.post(&url).json(query).send().await.map_err(|e| {
            FootprintError::transport(format!("Failed to reach {}: {}", self.base_url, e))
        })?;

        ensure_success(response).await
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(FootprintError::transport(format!("Service error ({}): {}", status, error_text)))
}

#[async_trait]
impl BuildingService for HttpBuildingService {
    async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("/api/health");
        let response = self.client.get(&url).send().await.map_err(|e| {
            FootprintError::transport(format!("Failed to reach {}: {}", self.base_url, e))
        })?;

        ensure_success(response)
            .await?
            .json::<HealthStatus>()
            .await
            .map_err(|e| FootprintError::transport(format!("Failed to parse health response: {}", e)))
    }

    async fn query_buildings(&self, query: &BuildingQuery) -> Result<BuildingCollection> {
        let body = self
            .post_query("/api/buildings", query)
            .await?
            .text()
            .await
            .map_err(|e| FootprintError::transport(format!("Failed to read response: {}", e)))?;

        let (features, metadata) = BuildingCollection::parse_response(&body)
            .map_err(|e| FootprintError::transport(format!("Malformed building response: {}", e)))?;

        let metadata = match metadata {
            Some(metadata) => metadata.normalized(query.limit),
            None => {
                tracing::debug!("Response carried no metadata, summarizing locally");
                metadata_for(&features, features.len(), query.limit, "")
            }
        };

        tracing::info!(
            returned = features.len(),
            total = metadata.total_buildings,
            truncated = metadata.truncated,
            "Received buildings"
        );

        Ok(BuildingCollection { features, metadata })
    }

    async fn building_stats(&self, query: &BuildingQuery) -> Result<BuildingStats> {
        self.post_query("/api/buildings/stats", query)
            .await?
            .json::<BuildingStats>()
            .await
            .map_err(|e| FootprintError::transport(format!("Failed to parse stats response: {}", e)))
    }

    async fn export_buildings(&self, query: &BuildingQuery) -> Result<ExportPayload> {
        let bytes = self
            .post_query("/api/export", query)
            .await?
            .bytes()
            .await
            .map_err(|e| FootprintError::transport(format!("Failed to read export: {}", e)))?;

        tracing::info!(bytes = bytes.len(), "Received export");
        Ok(ExportPayload::geojson(bytes.to_vec()))
    }
}
