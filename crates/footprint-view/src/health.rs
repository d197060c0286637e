use footprint_core::models::HealthStatus;
use footprint_core::ports::BuildingService;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Whether the building service has its data loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataReadiness {
    NotReady,
    Ready,
}

/// Outcome of waiting for the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    /// Health calls made, the successful one included
    pub attempts: usize,
    pub overture_release: Option<String>,
}

/// Polls service health on a fixed delay until the data is ready.
///
/// Failures and not-ready answers reschedule without backoff or retry cap. Once ready,
/// readiness never goes back.
#[derive(Debug)]
pub struct HealthMonitor {
    interval: Duration,
    tx: watch::Sender<DataReadiness>,
}

impl HealthMonitor {
    pub fn new(interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(DataReadiness::NotReady);
        Self { interval, tx }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn readiness(&self) -> DataReadiness {
        *self.tx.borrow()
    }

    /// Whether the "data not ready" indicator should be visible
    pub fn show_indicator(&self) -> bool {
        self.readiness() == DataReadiness::NotReady
    }

    pub fn subscribe(&self) -> watch::Receiver<DataReadiness> {
        self.tx.subscribe()
    }

    /// One health call. Returns the status when the service reports ready.
    pub async fn poll_once(&self, service: &dyn BuildingService) -> Option<HealthStatus> {
        match service.health().await {
            Ok(status) if status.is_ready() => {
                self.tx.send_if_modified(|readiness| {
                    let changed = *readiness != DataReadiness::Ready;
                    *readiness = DataReadiness::Ready;
                    changed
                });
                Some(status)
            }
            Ok(_) => {
                tracing::debug!("Building data not ready yet");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                None
            }
        }
    }

    /// Poll until the service reports ready
    pub async fn wait_until_ready(&self, service: &dyn BuildingService) -> HealthReport {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if let Some(status) = self.poll_once(service).await {
                tracing::info!(attempts, release = ?status.overture_release, "Building data ready");
                return HealthReport { attempts, overture_release: status.overture_release };
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Poll in the background
    pub fn spawn(self: Arc<Self>, service: Arc<dyn BuildingService>) -> JoinHandle<HealthReport> {
        tokio::spawn(async move { self.wait_until_ready(service.as_ref()).await })
    }
}
