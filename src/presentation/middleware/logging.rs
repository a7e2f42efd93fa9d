//! Request Logging Middleware
//!
//! Per-request span + start/end log lines via `tower_http`'s trace layer,
//! feeding the subscriber configured in `crate::telemetry`.

use axum::{body::Body, http::Request};
use tower_http::trace::TraceLayer;

pub fn create_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> tracing::Span + Clone,
> {
    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    })
}
