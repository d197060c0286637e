use footprint_core::models::{ViewState, ViewStateUpdate};
use tokio::sync::watch;

/// Single source of truth for the camera.
///
/// Every `set` publishes a fully populated snapshot to all subscribers, even when the
/// merged value equals the previous one.
#[derive(Debug)]
pub struct ViewStateStore {
    tx: watch::Sender<ViewState>,
}

impl Default for ViewStateStore {
    fn default() -> Self {
        Self::new(ViewState::DEFAULT)
    }
}

impl ViewStateStore {
    pub fn new(initial: ViewState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current camera
    pub fn get(&self) -> ViewState {
        *self.tx.borrow()
    }

    /// Merge `update` over the current camera and publish the result.
    ///
    /// Values are not range-checked.
    pub fn set(&self, update: impl Into<ViewStateUpdate>) -> ViewState {
        let next = self.get().merged(&update.into());
        self.tx.send_replace(next);
        tracing::trace!(
            longitude = next.longitude,
            latitude = next.latitude,
            zoom = next.zoom,
            "View state updated"
        );
        next
    }

    /// Receiver notified on every `set`
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
