//! Request and Response models
//!
//! DTOs for bus message bodies and the ingress HTTP API.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::DigestRequest;
pub use responses::{DigestResponse, HealthResponse, PublishResponse};
