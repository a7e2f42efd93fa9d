//! CORS Middleware Configuration

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS layer. Agents and admin tooling call this API directly
/// rather than from browser-hosted pages with origin-based trust, so there
/// is no configured allow-list to enforce.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
