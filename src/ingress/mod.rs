//! Ingress Module
//!
//! HTTP front door that forwards JSON bodies onto the bus.
//!
//! # Endpoints
//! - `POST /v1/api` - Publish a JSON object
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
