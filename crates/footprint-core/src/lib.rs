//! Footprint Core - Domain models, configuration, and service ports
//!
//! This crate contains the domain types shared by every footprint crate: camera state,
//! area and building features, the building service port, and layered configuration.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{FootprintError, Result};
