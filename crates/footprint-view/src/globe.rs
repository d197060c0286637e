use crate::store::ViewStateStore;
use footprint_core::models::{Position, ViewState};
use serde::Serialize;
use tokio::sync::watch;

/// Zoom of the locator globe, independent of the main camera
pub const GLOBE_ZOOM: f64 = 1.0;

/// Camera and marker of the locator globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobeView {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    /// Marker at the main camera centre
    pub marker: Position,
}

impl GlobeView {
    pub fn following(view: &ViewState) -> Self {
        Self {
            longitude: view.longitude,
            latitude: view.latitude,
            zoom: GLOBE_ZOOM,
            marker: [view.longitude, view.latitude],
        }
    }
}

/// Non-interactive secondary view that follows the main camera's centre
#[derive(Debug)]
pub struct MiniGlobe {
    rx: watch::Receiver<ViewState>,
    view: GlobeView,
}

impl MiniGlobe {
    pub fn new(store: &ViewStateStore) -> Self {
        let mut rx = store.subscribe();
        let view = GlobeView::following(&rx.borrow_and_update());
        Self { rx, view }
    }

    /// Whether the globe accepts gestures
    pub fn interactive(&self) -> bool {
        false
    }

    /// Last view the globe rendered
    pub fn view(&self) -> GlobeView {
        self.view
    }

    /// Catch up with the store. Returns whether the camera was updated since last time.
    pub fn refresh(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.view = GlobeView::following(&self.rx.borrow_and_update());
                true
            }
            _ => false,
        }
    }

    /// Wait for the next camera update and follow it
    pub async fn changed(&mut self) -> Option<GlobeView> {
        self.rx.changed().await.ok()?;
        self.view = GlobeView::following(&self.rx.borrow_and_update());
        Some(self.view)
    }
}
