use footprint_core::error::{FootprintError, Result};
use footprint_core::models::{AreaCollection, AreaFeature, AreaSource, Geometry};
use footprint_geo::ensure_valid;
use std::collections::HashSet;
use std::sync::Arc;

/// Parse an uploaded GeoJSON FeatureCollection into named areas.
///
/// Every feature must carry a valid Polygon or MultiPolygon; the first offending feature
/// fails the whole batch.
pub fn parse_area_batch(raw: &str) -> Result<Vec<AreaFeature>> {
    let geojson: geojson::GeoJson =
        raw.parse().map_err(|e| FootprintError::parse(format!("not valid GeoJSON: {}", e)))?;

    let geojson::GeoJson::FeatureCollection(collection) = geojson else {
        return Err(FootprintError::parse("expected a FeatureCollection"));
    };

    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let name = AreaFeature::derive_name(feature.properties.as_ref(), index);

            let geometry = feature
                .geometry
                .as_ref()
                .ok_or_else(|| FootprintError::parse(format!("{} has no geometry", name)))?;
            let geometry = Geometry::try_from(geometry)
                .map_err(|e| FootprintError::parse(format!("{}: {}", name, e)))?;
            ensure_valid(&geometry, &name).map_err(|e| FootprintError::parse(e.to_string()))?;

            let mut area = AreaFeature::new(name, geometry, AreaSource::Upload);
            area.properties = feature.properties.clone().unwrap_or_default();
            Ok(area)
        })
        .collect()
}

/// Uploaded candidate areas and the names currently selected.
///
/// Names are the selection keys. Features sharing a name are selected and deselected
/// together.
#[derive(Debug, Default)]
pub struct SelectionModel {
    batch: Vec<AreaFeature>,
    selected: HashSet<String>,
    active: Arc<AreaCollection>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candidate list with a parsed upload and select every feature.
    ///
    /// Returns the number of features loaded. On error nothing changes.
    pub fn load_batch(&mut self, raw: &str) -> Result<usize> {
        let features = parse_area_batch(raw)?;
        Ok(self.load_features(features))
    }

    /// Replace the candidate list with already parsed areas and select every feature
    pub fn load_features(&mut self, features: Vec<AreaFeature>) -> usize {
        self.selected = features.iter().map(|f| f.name.clone()).collect();
        self.batch = features;
        self.refresh();

        tracing::info!(
            features = self.batch.len(),
            distinct_names = self.selected.len(),
            "Loaded area batch"
        );
        self.batch.len()
    }

    /// Flip membership of `name`; unknown names are ignored.
    ///
    /// Returns whether `name` is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if !self.batch.iter().any(|f| f.name == name) {
            tracing::warn!(name, "Ignoring toggle of unknown area");
            return false;
        }

        let selected = if self.selected.remove(name) {
            false
        } else {
            self.selected.insert(name.to_string());
            true
        };
        self.refresh();

        tracing::debug!(name, selected, "Toggled area");
        selected
    }

    /// Selected features in upload order
    pub fn active_collection(&self) -> Arc<AreaCollection> {
        Arc::clone(&self.active)
    }

    /// Candidate names in upload order, duplicates included
    pub fn names(&self) -> Vec<&str> {
        self.batch.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Selected names in upload order, each listed once
    pub fn selected_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.batch
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| self.selected.contains(*name) && seen.insert(*name))
            .collect()
    }

    pub fn has_batch(&self) -> bool {
        !self.batch.is_empty()
    }

    /// Drop the batch and the selection
    pub fn clear(&mut self) {
        self.batch.clear();
        self.selected.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        let features = self
            .batch
            .iter()
            .filter(|f| self.selected.contains(&f.name))
            .cloned()
            .collect();
        self.active = Arc::new(AreaCollection::new(features));
    }
}
