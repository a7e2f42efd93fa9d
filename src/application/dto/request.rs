//! Request DTOs
//!
//! Data structures for API request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// `POST /api/auth/login`
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// `POST /api/auth/register`
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// `POST /api/auth/refresh`
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// `POST /api/auth/service-token`
#[derive(Debug, Deserialize, Validate)]
pub struct ServiceTokenRequest {
    #[validate(length(min = 1, message = "service_id is required"))]
    pub service_id: String,

    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "computer_name is required"))]
    pub computer_name: String,

    pub machine_id: Uuid,
}

/// `POST /api/sessions`. The agent identifies the `(user, machine)` pair;
/// the server decides whether to reopen, continue, or create.
#[derive(Debug, Deserialize)]
pub struct ResolveSessionRequest {
    pub machine_id: Uuid,
    pub ip_address: Option<String>,
    pub session_data: Option<Value>,
}

/// `POST /api/sessions/{id}/end`
#[derive(Debug, Deserialize)]
pub struct EndSessionRequest {
    /// Defaults to the current time when omitted.
    pub logout_time: Option<DateTime<Utc>>,
}

/// `POST /api/batch` or `/api/sessions/{id}/batch`
#[derive(Debug, Deserialize, Default)]
pub struct BatchIngestRequest {
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub activity_events: Vec<Value>,
    #[serde(default)]
    pub app_usages: Vec<Value>,
    #[serde(default)]
    pub system_metrics: Vec<Value>,
    #[serde(default)]
    pub session_events: Vec<Value>,
}

/// `POST /api/machines` handshake. Machines are resolved or created by
/// `(hostname, unique_id)`.
#[derive(Debug, Deserialize, Validate)]
pub struct MachineHandshakeRequest {
    #[validate(length(min = 1, message = "hostname is required"))]
    pub hostname: String,

    #[validate(length(min = 1, message = "unique_id is required"))]
    pub unique_id: String,

    pub mac: Option<String>,
    pub os: Option<String>,
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub ram: Option<String>,
}

/// Pagination query parameters shared by the thin-CRUD list endpoints.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(20).clamp(1, 200)
    }
}

/// `POST /api/roles`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// `POST /api/disciplines`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDisciplineRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// `POST /api/user-role-disciplines`
#[derive(Debug, Deserialize)]
pub struct AssignRoleDisciplineRequest {
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub discipline_id: Uuid,
}

/// `POST /api/activities`. Unlike the lenient, defaulting Activity Event
/// Writer used by the batch pipeline, the thin-CRUD endpoint requires a
/// well-formed event type and time up front.
#[derive(Debug, Deserialize)]
pub struct CreateActivityEventRequest {
    pub session_id: Uuid,
    pub app_id: Option<Uuid>,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub event_data: Option<Value>,
}

/// `POST /api/app-usages`
#[derive(Debug, Deserialize)]
pub struct CreateAppUsageRequest {
    pub session_id: Uuid,
    pub app_id: Uuid,
    pub window_title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// `POST /api/system-metrics`
#[derive(Debug, Deserialize)]
pub struct CreateSystemMetricsRequest {
    pub session_id: Uuid,
    pub cpu_usage: f64,
    pub gpu_usage: f64,
    pub memory_usage: f64,
    pub measurement_time: DateTime<Utc>,
}

/// `POST /api/session-events`
#[derive(Debug, Deserialize)]
pub struct CreateSessionEventRequest {
    pub session_id: Uuid,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub user_id: Uuid,
    pub previous_user_id: Option<Uuid>,
    pub machine_id: Uuid,
    pub terminal_session_id: Option<String>,
    pub is_remote: bool,
    pub event_data: Option<Value>,
}
