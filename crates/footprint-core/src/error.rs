//! Error types for footprint

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FootprintError {
    // Area upload errors
    #[error("Invalid area upload: {reason}")]
    Parse { reason: String },

    #[error("Invalid geometry at feature {feature}: {reason}")]
    InvalidGeometry { feature: String, reason: String },

    // Building service errors
    #[error("Building service request failed: {reason}")]
    Transport { reason: String },

    #[error("No area of interest selected")]
    EmptySelection,

    // Draw session errors
    #[error("No drawing in progress")]
    NoActiveDraw,

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FootprintError {
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse { reason: reason.into() }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, FootprintError>;
