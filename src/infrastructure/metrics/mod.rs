//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Database query duration histograms
//! - Batch ingest item counts
//! - Session resolution counts
//! - Token sweep deletions

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace("activity_tracker"),
        &["method", "path", "status"],
    )
    .expect("failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("activity_tracker")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Database query duration histogram
pub static DB_QUERY_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];
    HistogramVec::new(
        HistogramOpts::new(
            "db_query_duration_seconds",
            "Database query latency in seconds",
        )
        .namespace("activity_tracker")
        .buckets(buckets),
        &["operation", "table"],
    )
    .expect("failed to create DB_QUERY_DURATION_SECONDS metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics")
            .namespace("activity_tracker"),
        &["state"], // "idle", "active", "max"
    )
    .expect("failed to create DB_POOL_CONNECTIONS metric")
});

/// Total items processed across all batch-ingest streams, by stream and outcome.
pub static BATCH_ITEMS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("batch_items_total", "Batch ingest items processed")
            .namespace("activity_tracker"),
        &["stream", "outcome"], // outcome: "success" | "failure"
    )
    .expect("failed to create BATCH_ITEMS_TOTAL metric")
});

/// Session resolutions, by outcome (created / reopened / continued).
pub static SESSIONS_RESOLVED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("sessions_resolved_total", "Sessions resolved by the session engine")
            .namespace("activity_tracker"),
        &["outcome"],
    )
    .expect("failed to create SESSIONS_RESOLVED_TOTAL metric")
});

/// Tokens deleted by the background expiry sweep.
pub static TOKEN_SWEEP_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("token_sweep_deleted_total", "Expired tokens deleted by the sweep task")
            .namespace("activity_tracker"),
    )
    .expect("failed to create TOKEN_SWEEP_DELETED_TOTAL metric")
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(DB_QUERY_DURATION_SECONDS.clone()))
        .expect("failed to register DB_QUERY_DURATION_SECONDS");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("failed to register DB_POOL_CONNECTIONS");
    registry
        .register(Box::new(BATCH_ITEMS_TOTAL.clone()))
        .expect("failed to register BATCH_ITEMS_TOTAL");
    registry
        .register(Box::new(SESSIONS_RESOLVED_TOTAL.clone()))
        .expect("failed to register SESSIONS_RESOLVED_TOTAL");
    registry
        .register(Box::new(TOKEN_SWEEP_DELETED_TOTAL.clone()))
        .expect("failed to register TOKEN_SWEEP_DELETED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("failed to encode metrics");
    String::from_utf8(buffer).expect("metrics should be valid UTF-8")
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record database query metrics
pub fn record_db_query(operation: &str, table: &str, duration_secs: f64) {
    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[operation, table])
        .observe(duration_secs);
}

/// Helper to update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32, max: u32) {
    DB_POOL_CONNECTIONS.with_label_values(&["idle"]).set(idle as f64);
    DB_POOL_CONNECTIONS.with_label_values(&["active"]).set(active as f64);
    DB_POOL_CONNECTIONS.with_label_values(&["max"]).set(max as f64);
}

/// Helper to record one batch stream's outcome counts.
pub fn record_batch_stream(stream: &str, success: u64, failure: u64) {
    BATCH_ITEMS_TOTAL
        .with_label_values(&[stream, "success"])
        .inc_by(success);
    BATCH_ITEMS_TOTAL
        .with_label_values(&[stream, "failure"])
        .inc_by(failure);
}

/// Helper to record a session engine outcome ("created" | "reopened" | "continued").
pub fn record_session_resolved(outcome: &str) {
    SESSIONS_RESOLVED_TOTAL.with_label_values(&[outcome]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = &*REGISTRY;
        let _ = &*HTTP_REQUESTS_TOTAL;
        let _ = &*HTTP_REQUEST_DURATION_SECONDS;
        let _ = &*BATCH_ITEMS_TOTAL;
        let _ = &*SESSIONS_RESOLVED_TOTAL;
        let _ = &*TOKEN_SWEEP_DELETED_TOTAL;
    }

    #[test]
    fn test_gather_metrics() {
        let metrics = gather_metrics();
        assert!(!metrics.is_empty());
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/status/ping", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("http_requests_total"));
    }

    #[test]
    fn test_record_batch_stream() {
        record_batch_stream("activity_events", 3, 1);
        let metrics = gather_metrics();
        assert!(metrics.contains("batch_items_total"));
    }
}
