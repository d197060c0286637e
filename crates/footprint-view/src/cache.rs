use chrono::{DateTime, Utc};
use footprint_core::error::Result;
use footprint_core::models::{BuildingCollection, BuildingFeature, BuildingMetadata, BuildingQuery};
use footprint_geo::PickIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Monotonic tag of a building request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Claim on a future cache commit, issued when a fetch begins
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub id: RequestId,
    pub query: BuildingQuery,
}

/// Committed fetch result
#[derive(Debug)]
pub struct Dataset {
    pub request_id: RequestId,
    pub features: Vec<BuildingFeature>,
    pub metadata: BuildingMetadata,
    pub fetched_at: DateTime<Utc>,
    /// Pick index over `features`, in feature order
    pub index: PickIndex,
}

impl Dataset {
    fn new(request_id: RequestId, collection: BuildingCollection, limit: usize) -> Self {
        let index = PickIndex::build(collection.features.iter().map(|f| &f.geometry));
        Self {
            request_id,
            metadata: collection.metadata.normalized(limit),
            features: collection.features,
            fetched_at: Utc::now(),
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Holder of the most recently committed building set.
///
/// Results commit in completion order: whichever relevant request resolves last wins.
/// A request stays relevant while its ticket is in flight.
#[derive(Debug, Default)]
pub struct DatasetCache {
    current: Option<Arc<Dataset>>,
    in_flight: BTreeSet<RequestId>,
    next_id: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request and mark it in flight
    pub fn begin_fetch(&mut self, query: BuildingQuery) -> FetchTicket {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.in_flight.insert(id);

        tracing::debug!(request = %id, limit = query.limit, "Fetch started");
        FetchTicket { id, query }
    }

    /// Settle a request.
    ///
    /// Returns `Ok(true)` when the result was committed and `Ok(false)` when it was
    /// discarded as stale. A failure of a relevant request leaves the cache unchanged and
    /// is returned.
    pub fn complete(&mut self, ticket: &FetchTicket, result: Result<BuildingCollection>) -> Result<bool> {
        if !self.in_flight.remove(&ticket.id) {
            tracing::debug!(request = %ticket.id, "Discarding stale fetch result");
            return Ok(false);
        }

        match result {
            Ok(collection) => {
                let dataset = Dataset::new(ticket.id, collection, ticket.query.limit);
                tracing::info!(
                    request = %ticket.id,
                    buildings = dataset.len(),
                    total = dataset.metadata.total_buildings,
                    truncated = dataset.metadata.truncated,
                    "Committed buildings"
                );
                self.current = Some(Arc::new(dataset));
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(request = %ticket.id, error = %e, "Fetch failed, keeping previous buildings");
                Err(e)
            }
        }
    }

    /// Drop every in-flight request; their results will be discarded
    pub fn invalidate(&mut self) {
        if !self.in_flight.is_empty() {
            tracing::debug!(dropped = self.in_flight.len(), "Invalidated in-flight fetches");
        }
        self.in_flight.clear();
    }

    /// Most recently committed dataset
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.current.clone()
    }

    pub fn metadata(&self) -> Option<&BuildingMetadata> {
        self.current.as_deref().map(|d| &d.metadata)
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
