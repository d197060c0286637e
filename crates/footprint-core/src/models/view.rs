use serde::{Deserialize, Serialize};

/// Camera shared by the base map and the overlay renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewState {
    /// Session start camera (Nairobi)
    pub const DEFAULT: ViewState =
        ViewState { longitude: 36.82, latitude: -1.28, zoom: 12.0, pitch: 0.0, bearing: 0.0 };

    /// Merge `update` over this value, producing a fully populated replacement
    pub fn merged(&self, update: &ViewStateUpdate) -> ViewState {
        ViewState {
            longitude: update.longitude.unwrap_or(self.longitude),
            latitude: update.latitude.unwrap_or(self.latitude),
            zoom: update.zoom.unwrap_or(self.zoom),
            pitch: update.pitch.unwrap_or(self.pitch),
            bearing: update.bearing.unwrap_or(self.bearing),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial camera update; absent fields keep their previous value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewStateUpdate {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub bearing: Option<f64>,
}

impl ViewStateUpdate {
    pub fn center(longitude: f64, latitude: f64) -> Self {
        Self { longitude: Some(longitude), latitude: Some(latitude), ..Default::default() }
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }
}

impl From<ViewState> for ViewStateUpdate {
    fn from(view: ViewState) -> Self {
        Self {
            longitude: Some(view.longitude),
            latitude: Some(view.latitude),
            zoom: Some(view.zoom),
            pitch: Some(view.pitch),
            bearing: Some(view.bearing),
        }
    }
}
