//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod service;

pub use service::BuildingService;
