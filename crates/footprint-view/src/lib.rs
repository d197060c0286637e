//! Footprint View - Spatial view-state and layer-composition pipeline
//!
//! The explorer keeps every piece of interactive state in an owned store:
//! - `store`: camera state shared with the overlay and the mini globe
//! - `selection` and `draw`: where areas of interest come from
//! - `cache`: fetched buildings, tagged by request
//! - `compositor`, `router` and `bridge`: rendering, picking and overlay sync
//!
//! `ExplorerSession` owns all of them and wires the data flow from area to tooltip.

pub mod bridge;
pub mod cache;
pub mod compositor;
pub mod draw;
pub mod globe;
pub mod health;
pub mod router;
pub mod selection;
pub mod session;
pub mod store;
pub mod summary;

pub use bridge::{LoggingOverlay, OverlayBridge, OverlayProps, OverlayRenderer};
pub use cache::{Dataset, DatasetCache, FetchTicket, RequestId};
pub use compositor::{
    compose_layers, LayerCompositor, LayerData, LayerStyle, RenderLayer, Rgba, AREA_LAYER_ID,
    BUILDINGS_LAYER_ID, DRAW_LAYER_ID,
};
pub use draw::{DrawMode, DrawSession, Sketch};
pub use globe::{GlobeView, MiniGlobe};
pub use health::{DataReadiness, HealthMonitor};
pub use router::{InteractionRouter, Pick, PointerEvent, Tooltip};
pub use selection::{parse_area_batch, SelectionModel};
pub use session::{ExplorerSession, FetchOutcome, PendingFetch};
pub use store::ViewStateStore;
pub use summary::{DataSummary, SourceShare};
