//! Middleware
//!
//! Tower layers applied to the whole router in `startup.rs`. Per-route
//! authentication is handled by extractors (`presentation::http::extractors`)
//! rather than a blanket middleware, since different endpoints require
//! different `AuthLevel`s.

pub mod cors;
pub mod logging;
pub mod security;

pub use cors::create_cors_layer;
pub use logging::create_trace_layer;
pub use security::{create_security_headers_layer, SecurityHeadersConfig, SecurityHeadersLayer};
