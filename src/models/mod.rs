//! Response models for the node API
//!
//! This module defines the DTOs serialized into the JSON bodies of the
//! admin endpoints. The peer protocol itself carries raw bytes.

pub mod responses;

// Re-export commonly used types
pub use responses::{GroupStatsResponse, HealthResponse};
