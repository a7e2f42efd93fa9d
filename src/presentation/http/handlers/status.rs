//! Status Handlers
//!
//! - `GET /api/status/ping` — liveness, no auth.
//! - `GET /api/status/health` — full health including uptime/version, user auth.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::presentation::http::extractors::RequireUser;
use crate::startup::AppState;

static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Force the lazily-initialized start time to record boot, not first request.
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { status: "ok", message: "pong" })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub database: DatabaseHealth,
}

/// `GET /api/status/health`. Requires a user credential per §6.
pub async fn health(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
) -> impl IntoResponse {
    let uptime_seconds = SERVER_START.elapsed().as_secs();
    let started_at = SERVER_START_TIME.to_rfc3339();

    let start = Instant::now();
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            DatabaseHealth {
                status: if latency_ms < 100 { HealthStatus::Healthy } else { HealthStatus::Degraded },
                latency_ms: Some(latency_ms),
                message: None,
            }
        }
        Err(e) => DatabaseHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: None,
            message: Some(format!("database connection failed: {e}")),
        },
    };

    let status_code = match database.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let overall = database.status;

    (
        status_code,
        Json(HealthResponse {
            status: overall,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds,
            started_at,
            database,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_serializes_lowercase() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }
}
