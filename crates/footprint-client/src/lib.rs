//! Footprint Client - Adapters of the building service port
//!
//! `HttpBuildingService` talks to the remote building-footprint service over HTTP.
//! `MemoryBuildingService` answers the same port from buildings held in memory, for
//! offline use and tests.

pub mod http;
pub mod memory;

pub use http::HttpBuildingService;
pub use memory::MemoryBuildingService;
