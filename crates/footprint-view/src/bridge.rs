use crate::compositor::RenderLayer;
use crate::store::ViewStateStore;
use footprint_core::models::ViewState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Properties pushed to the overlay renderer
#[derive(Debug, Clone)]
pub struct OverlayProps {
    pub layers: Arc<Vec<RenderLayer>>,
    pub view_state: ViewState,
}

/// Renderer drawing the layer list above the base map
pub trait OverlayRenderer: Send {
    fn set_props(&mut self, props: OverlayProps);
}

/// Headless renderer that reports each push through `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingOverlay {
    pushes: Arc<AtomicUsize>,
}

impl LoggingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pushes received, shared across clones
    pub fn pushes(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }
}

impl OverlayRenderer for LoggingOverlay {
    fn set_props(&mut self, props: OverlayProps) {
        let push = self.pushes.fetch_add(1, Ordering::SeqCst) + 1;
        for layer in props.layers.iter() {
            tracing::debug!(
                push,
                layer = layer.id,
                features = layer.data.feature_count(),
                fill = ?layer.style.fill,
                "Overlay layer"
            );
        }
        tracing::debug!(
            push,
            longitude = props.view_state.longitude,
            latitude = props.view_state.latitude,
            zoom = props.view_state.zoom,
            "Overlay camera"
        );
    }
}

/// Keeps one overlay renderer in step with the layer list and the camera.
///
/// Props are pushed only when the layer list (by identity) or the camera changed. Camera
/// reports coming back from the base map are ignored when they equal the camera last
/// pushed, so a push never echoes into the store.
#[derive(Default)]
pub struct OverlayBridge {
    renderer: Option<Box<dyn OverlayRenderer>>,
    last_layers: Option<Arc<Vec<RenderLayer>>>,
    last_camera: Option<ViewState>,
}

impl std::fmt::Debug for OverlayBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayBridge")
            .field("mounted", &self.is_mounted())
            .field("last_camera", &self.last_camera)
            .finish()
    }
}

impl OverlayBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a renderer for a newly mounted base map, replacing any previous one
    pub fn mount(&mut self, renderer: Box<dyn OverlayRenderer>) {
        if self.renderer.is_some() {
            tracing::debug!("Replacing mounted overlay renderer");
        }
        self.renderer = Some(renderer);
        self.last_layers = None;
        self.last_camera = None;
    }

    /// Detach the renderer when the base map goes away
    pub fn unmount(&mut self) -> Option<Box<dyn OverlayRenderer>> {
        self.last_layers = None;
        self.last_camera = None;
        self.renderer.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.renderer.is_some()
    }

    /// Push layers and camera if either changed since the last push.
    ///
    /// Returns whether a push happened.
    pub fn sync(&mut self, layers: &Arc<Vec<RenderLayer>>, view_state: ViewState) -> bool {
        let Some(renderer) = self.renderer.as_mut() else {
            return false;
        };

        let same_layers = self.last_layers.as_ref().is_some_and(|last| Arc::ptr_eq(last, layers));
        if same_layers && self.last_camera == Some(view_state) {
            return false;
        }

        renderer.set_props(OverlayProps { layers: Arc::clone(layers), view_state });
        self.last_layers = Some(Arc::clone(layers));
        self.last_camera = Some(view_state);
        true
    }

    /// Forward a base-map camera report into the store.
    ///
    /// Returns whether the store was updated.
    pub fn camera_moved(&mut self, store: &ViewStateStore, view_state: ViewState) -> bool {
        if self.last_camera == Some(view_state) {
            tracing::trace!("Suppressing camera echo");
            return false;
        }
        store.set(view_state);
        // The base map now shows a camera the overlay was never given
        self.last_camera = None;
        true
    }
}
