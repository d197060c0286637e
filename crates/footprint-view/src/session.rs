use crate::bridge::{OverlayBridge, OverlayRenderer};
use crate::cache::{Dataset, DatasetCache, FetchTicket};
use crate::compositor::{LayerCompositor, RenderLayer};
use crate::draw::{DrawMode, DrawSession};
use crate::globe::MiniGlobe;
use crate::router::{InteractionRouter, Pick, PointerEvent, Tooltip};
use crate::selection::SelectionModel;
use crate::store::ViewStateStore;
use crate::summary::DataSummary;
use footprint_core::config::LayeredConfig;
use footprint_core::error::Result;
use footprint_core::models::{
    AreaCollection, AreaFeature, BuildingCollection, BuildingQuery, BuildingStats, ExportPayload,
    ViewState, ViewStateUpdate, DEFAULT_FEATURE_LIMIT,
};
use footprint_core::ports::BuildingService;
use std::sync::Arc;

/// Default building opacity
pub const DEFAULT_OPACITY: f64 = 0.6;

/// Which area action happened last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AreaOrigin {
    Upload,
    Drawn,
}

/// Building request that has been tagged but not sent.
///
/// Holds no borrow of the session, so the session stays usable while it runs.
#[derive(Debug)]
pub struct PendingFetch {
    ticket: FetchTicket,
}

impl PendingFetch {
    pub fn ticket(&self) -> &FetchTicket {
        &self.ticket
    }

    pub fn query(&self) -> &BuildingQuery {
        &self.ticket.query
    }

    pub async fn run(self, service: &dyn BuildingService) -> FetchOutcome {
        let result = service.query_buildings(&self.ticket.query).await;
        FetchOutcome { ticket: self.ticket, result }
    }
}

/// Settled building request, ready to be committed
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<BuildingCollection>,
}

/// Single owner of every explorer store.
///
/// Area actions feed the query geometry; the most recent action wins, whether it was an
/// upload, a toggle or a completed drawing.
#[derive(Debug)]
pub struct ExplorerSession {
    view: ViewStateStore,
    selection: SelectionModel,
    draw: DrawSession,
    drawn: Option<Arc<AreaCollection>>,
    origin: Option<AreaOrigin>,
    cache: DatasetCache,
    compositor: LayerCompositor,
    router: InteractionRouter,
    bridge: OverlayBridge,
    opacity: f64,
    feature_limit: usize,
}

impl Default for ExplorerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerSession {
    pub fn new() -> Self {
        Self {
            view: ViewStateStore::default(),
            selection: SelectionModel::new(),
            draw: DrawSession::new(),
            drawn: None,
            origin: None,
            cache: DatasetCache::new(),
            compositor: LayerCompositor::new(),
            router: InteractionRouter::new(),
            bridge: OverlayBridge::new(),
            opacity: DEFAULT_OPACITY,
            feature_limit: DEFAULT_FEATURE_LIMIT,
        }
    }

    /// Session using the configured opacity and feature limit
    pub fn from_config(config: &LayeredConfig) -> Self {
        let mut session = Self::new();
        session.set_opacity(config.opacity.value);
        session.feature_limit = config.feature_limit.value;
        session
    }

    pub fn view_store(&self) -> &ViewStateStore {
        &self.view
    }

    pub fn view_state(&self) -> ViewState {
        self.view.get()
    }

    pub fn set_view(&self, update: impl Into<ViewStateUpdate>) -> ViewState {
        self.view.set(update)
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn feature_limit(&self) -> usize {
        self.feature_limit
    }

    // Areas

    /// Load an uploaded FeatureCollection; it becomes the area of interest
    pub fn upload_area(&mut self, raw: &str) -> Result<usize> {
        let loaded = self.selection.load_batch(raw)?;
        self.origin = Some(AreaOrigin::Upload);
        Ok(loaded)
    }

    /// Flip selection of an uploaded area. Returns whether it is selected afterwards.
    pub fn toggle_area(&mut self, name: &str) -> bool {
        if !self.selection.names().contains(&name) {
            return self.selection.toggle(name);
        }
        let selected = self.selection.toggle(name);
        self.origin = Some(AreaOrigin::Upload);
        selected
    }

    pub fn start_draw(&mut self, mode: DrawMode) {
        self.draw.start(mode);
    }

    pub fn add_vertex(&mut self, longitude: f64, latitude: f64) -> Result<()> {
        self.draw.add_vertex(longitude, latitude)
    }

    pub fn cancel_draw(&mut self) {
        self.draw.cancel();
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw.mode()
    }

    /// Finish the drawing; it becomes the area of interest
    pub fn complete_draw(&mut self) -> Result<AreaFeature> {
        let feature = self.draw.complete()?;
        self.drawn = Some(Arc::new(AreaCollection::new(vec![feature.clone()])));
        self.origin = Some(AreaOrigin::Drawn);
        Ok(feature)
    }

    /// Forget every area and drop in-flight fetches made for them
    pub fn clear_area(&mut self) {
        self.selection.clear();
        self.drawn = None;
        self.origin = None;
        self.cache.invalidate();
    }

    /// Area sent with the next request, `None` when nothing is selected
    pub fn active_area(&self) -> Option<Arc<AreaCollection>> {
        let area = match self.origin? {
            AreaOrigin::Upload => Some(self.selection.active_collection()),
            AreaOrigin::Drawn => self.drawn.clone(),
        };
        area.filter(|a| !a.is_empty())
    }

    // Rendering

    /// Set building opacity, clamped to `[0, 1]`
    pub fn set_opacity(&mut self, opacity: f64) -> f64 {
        self.opacity = if opacity.is_nan() { DEFAULT_OPACITY } else { opacity.clamp(0.0, 1.0) };
        self.opacity
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Current render pass, shared while nothing changed
    pub fn layers(&mut self) -> Arc<Vec<RenderLayer>> {
        let area = self.active_area();
        let buildings = self.cache.current();
        let draw = self.draw.draw_layer();
        self.compositor.compose(area.as_ref(), buildings.as_ref(), self.opacity, draw.as_ref())
    }

    pub fn mount_overlay(&mut self, renderer: Box<dyn OverlayRenderer>) {
        self.bridge.mount(renderer);
    }

    pub fn unmount_overlay(&mut self) -> Option<Box<dyn OverlayRenderer>> {
        self.bridge.unmount()
    }

    /// Push the current layers and camera to the overlay if either changed
    pub fn sync_overlay(&mut self) -> bool {
        let layers = self.layers();
        let view = self.view.get();
        self.bridge.sync(&layers, view)
    }

    /// Base-map gesture report
    pub fn camera_moved(&mut self, view: ViewState) -> bool {
        self.bridge.camera_moved(&self.view, view)
    }

    pub fn mini_globe(&self) -> MiniGlobe {
        MiniGlobe::new(&self.view)
    }

    // Interaction

    pub fn hover(&mut self, event: PointerEvent) -> Option<Pick> {
        let layers = self.layers();
        self.router.hover(event, &layers).cloned()
    }

    pub fn leave(&mut self) {
        self.router.leave();
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.router.current().map(Tooltip::from_pick)
    }

    // Data

    /// Tag a request for the active area.
    ///
    /// Returns `None` without side effects when no area is selected.
    pub fn prepare_fetch(&mut self, limit: usize) -> Option<PendingFetch> {
        let Some(geometry) = self.active_area().and_then(|area| area.query_geometry()) else {
            tracing::debug!("No area selected, skipping fetch");
            return None;
        };
        let ticket = self.cache.begin_fetch(BuildingQuery::new(geometry).with_limit(limit));
        Some(PendingFetch { ticket })
    }

    /// Apply a settled request. Returns whether it replaced the buildings.
    pub fn commit(&mut self, outcome: FetchOutcome) -> Result<bool> {
        let committed = self.cache.complete(&outcome.ticket, outcome.result)?;
        if committed {
            // Pick indices refer to the previous buildings
            self.router.leave();
        }
        Ok(committed)
    }

    /// Fetch buildings for the active area with the session's feature limit
    pub async fn fetch(&mut self, service: &dyn BuildingService) -> Result<bool> {
        let Some(pending) = self.prepare_fetch(self.feature_limit) else {
            return Ok(false);
        };
        let outcome = pending.run(service).await;
        self.commit(outcome)
    }

    /// Export buildings of the active area; `None` when no area is selected
    pub async fn export(&self, service: &dyn BuildingService) -> Result<Option<ExportPayload>> {
        match self.current_query() {
            Some(query) => service.export_buildings(&query).await.map(Some),
            None => Ok(None),
        }
    }

    /// Statistics of the active area without fetching geometry
    pub async fn stats(&self, service: &dyn BuildingService) -> Result<Option<BuildingStats>> {
        match self.current_query() {
            Some(query) => service.building_stats(&query).await.map(Some),
            None => Ok(None),
        }
    }

    fn current_query(&self) -> Option<BuildingQuery> {
        let geometry = self.active_area()?.query_geometry()?;
        Some(BuildingQuery::new(geometry).with_limit(self.feature_limit))
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.cache.current()
    }

    pub fn summary(&self) -> Option<DataSummary> {
        self.cache.metadata().map(DataSummary::from_metadata)
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{AREA_LAYER_ID, BUILDINGS_LAYER_ID, DRAW_LAYER_ID};
    use footprint_client::MemoryBuildingService;
    use footprint_core::models::{BuildingFeature, BuildingProperties, Geometry, GeometryType};

    const AREAS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "A"},
         "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]}},
        {"type": "Feature", "properties": {"name": "B"},
         "geometry": {"type": "Polygon", "coordinates": [[[5, 5], [7, 5], [7, 7], [5, 7], [5, 5]]]}}
    ]}"#;

    fn service() -> MemoryBuildingService {
        let building = |id: &str, x: f64, y: f64| BuildingFeature {
            id: id.to_string(),
            geometry: Geometry::polygon(vec![vec![
                [x, y],
                [x + 0.5, y],
                [x + 0.5, y + 0.5],
                [x, y + 0.5],
                [x, y],
            ]]),
            properties: BuildingProperties { height: Some(6.0), ..Default::default() },
        };
        MemoryBuildingService::new(vec![building("in-a", 1.0, 1.0), building("in-b", 6.0, 6.0)])
    }

    #[test]
    fn test_no_area_means_no_fetch() {
        let mut session = ExplorerSession::new();
        assert!(session.active_area().is_none());
        assert!(session.prepare_fetch(10).is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_deselecting_everything_clears_area() {
        let mut session = ExplorerSession::new();
        session.upload_area(AREAS).unwrap();
        session.toggle_area("A");
        session.toggle_area("B");

        assert!(session.active_area().is_none());
        assert!(session.prepare_fetch(10).is_none());
    }

    #[test]
    fn test_most_recent_area_action_wins() {
        let mut session = ExplorerSession::new();
        session.upload_area(AREAS).unwrap();
        assert_eq!(
            session.active_area().unwrap().query_geometry().unwrap().geometry_type(),
            GeometryType::MultiPolygon
        );

        session.start_draw(DrawMode::Rectangle);
        session.add_vertex(10.0, 10.0).unwrap();
        session.add_vertex(11.0, 11.0).unwrap();
        session.complete_draw().unwrap();
        assert_eq!(session.active_area().unwrap().names(), vec!["Drawn rectangle 1"]);

        session.toggle_area("B");
        assert_eq!(session.active_area().unwrap().names(), vec!["A"]);

        // Unknown names do not count as an area action
        session.start_draw(DrawMode::Polygon);
        for (x, y) in [(10.0, 10.0), (11.0, 10.0), (11.0, 11.0)] {
            session.add_vertex(x, y).unwrap();
        }
        session.complete_draw().unwrap();
        session.toggle_area("missing");
        assert_eq!(session.active_area().unwrap().names(), vec!["Drawn polygon 2"]);
    }

    #[test]
    fn test_opacity_clamped() {
        let mut session = ExplorerSession::new();
        assert_eq!(session.set_opacity(1.7), 1.0);
        assert_eq!(session.set_opacity(-0.2), 0.0);
        assert_eq!(session.set_opacity(f64::NAN), DEFAULT_OPACITY);
    }

    #[tokio::test]
    async fn test_fetch_composes_and_picks() {
        let service = service();
        let mut session = ExplorerSession::new();
        session.upload_area(AREAS).unwrap();
        session.toggle_area("B");

        assert!(session.fetch(&service).await.unwrap());
        let dataset = session.dataset().unwrap();
        assert_eq!(dataset.features.len(), 1);
        assert_eq!(dataset.features[0].id, "in-a");

        let layers = session.layers();
        let ids: Vec<_> = layers.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![AREA_LAYER_ID, BUILDINGS_LAYER_ID]);

        let pick = session.hover(PointerEvent::new(5.0, 5.0, [1.2, 1.2])).unwrap();
        assert_eq!(pick.layer_id, BUILDINGS_LAYER_ID);
        assert_eq!(session.tooltip().unwrap().lines, vec!["Height: 6m"]);

        session.leave();
        assert!(session.tooltip().is_none());
    }

    #[tokio::test]
    async fn test_draw_layer_tops_the_stack() {
        let mut session = ExplorerSession::new();
        session.upload_area(AREAS).unwrap();
        session.fetch(&service()).await.unwrap();
        session.start_draw(DrawMode::Polygon);

        let layers = session.layers();
        assert_eq!(layers.last().unwrap().id, DRAW_LAYER_ID);
        assert!(Arc::ptr_eq(&layers, &session.layers()));

        session.add_vertex(0.5, 0.5).unwrap();
        assert!(!Arc::ptr_eq(&layers, &session.layers()));
    }

    #[tokio::test]
    async fn test_export_and_stats_need_an_area() {
        let service = service();
        let mut session = ExplorerSession::new();
        assert!(session.export(&service).await.unwrap().is_none());
        assert!(session.stats(&service).await.unwrap().is_none());

        session.upload_area(AREAS).unwrap();
        let payload = session.export(&service).await.unwrap().unwrap();
        assert_eq!(payload.file_name, "overture_buildings.geojson");

        let stats = session.stats(&service).await.unwrap().unwrap();
        assert_eq!(stats.total_buildings, 2);
        assert_eq!(stats.avg_height, Some(6.0));
    }

    #[tokio::test]
    async fn test_clear_area_discards_in_flight_fetch() {
        let service = service();
        let mut session = ExplorerSession::new();
        session.upload_area(AREAS).unwrap();

        let pending = session.prepare_fetch(100).unwrap();
        assert!(session.is_loading());
        session.clear_area();
        assert!(!session.is_loading());

        let outcome = pending.run(&service).await;
        assert!(!session.commit(outcome).unwrap());
        assert!(session.dataset().is_none());
    }
}
