//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;
use uuid::Uuid;

use crate::application::services::TokenPair;
use crate::domain::entities::{
    ActivityEvent, AfkPeriod, AppUsage, Discipline, Machine, Role, Session, SessionEvent,
    SystemMetricsSample, User, UserRoleDiscipline,
};
use crate::domain::services::ChainStats;

/// `POST /api/auth/login`, `/register`, `/refresh`
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type.to_string(),
        }
    }
}

/// `POST /api/auth/register` (user + tokens)
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

/// A user, with the email omitted unless the caller is the user themself
/// or an admin.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub active: bool,
    pub verified: bool,
    pub status: Option<String>,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: User, include_email: bool) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: if include_email { Some(user.email) } else { None },
            active: user.active,
            verified: user.verified,
            status: user.status,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// `POST /api/machines` handshake response.
#[derive(Debug, Serialize)]
pub struct MachineResponse {
    pub id: Uuid,
    pub hostname: String,
    pub unique_id: String,
    pub mac: Option<String>,
    pub os: Option<String>,
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub ram: Option<String>,
    pub last_seen: String,
    pub active: bool,
}

impl From<Machine> for MachineResponse {
    fn from(m: Machine) -> Self {
        Self {
            id: m.id,
            hostname: m.hostname,
            unique_id: m.unique_id,
            mac: m.mac,
            os: m.os,
            cpu: m.cpu,
            gpu: m.gpu,
            ram: m.ram,
            last_seen: m.last_seen.to_rfc3339(),
            active: m.active,
        }
    }
}

/// `POST /api/sessions` response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub machine_id: Uuid,
    pub login_time: String,
    pub logout_time: Option<String>,
    pub continued_from_session: Option<Uuid>,
    pub continued_by_session: Option<Uuid>,
    pub previous_session_end_time: Option<String>,
    pub time_since_previous_session: Option<i64>,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            machine_id: s.machine_id,
            login_time: s.login_time.to_rfc3339(),
            logout_time: s.logout_time.map(|t| t.to_rfc3339()),
            continued_from_session: s.continued_from_session,
            continued_by_session: s.continued_by_session,
            previous_session_end_time: s.previous_session_end_time.map(|t| t.to_rfc3339()),
            time_since_previous_session: s.time_since_previous_session,
        }
    }
}

/// `GET /api/sessions/{id}/chain` response.
#[derive(Debug, Serialize)]
pub struct ChainResponse {
    pub sessions: Vec<SessionResponse>,
}

/// `GET /api/sessions/{id}/chain/stats` response.
#[derive(Debug, Serialize)]
pub struct ChainStatsResponse {
    pub total_sessions: usize,
    pub first_login: String,
    pub last_activity: String,
    pub total_duration_seconds: i64,
    pub total_gap_seconds: i64,
    pub real_time_span_seconds: i64,
    pub continuity_percentage: f64,
}

impl From<ChainStats> for ChainStatsResponse {
    fn from(s: ChainStats) -> Self {
        Self {
            total_sessions: s.total_sessions,
            first_login: s.first_login.to_rfc3339(),
            last_activity: s.last_activity.to_rfc3339(),
            total_duration_seconds: s.total_duration_seconds,
            total_gap_seconds: s.total_gap_seconds,
            real_time_span_seconds: s.real_time_span_seconds,
            continuity_percentage: s.continuity_percentage,
        }
    }
}

/// Generic pagination envelope for the thin-CRUD list endpoints.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total: i64,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, page: i64, size: i64, total: i64) -> Self {
        Self { items, page, size, total }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityEventResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub app_id: Option<Uuid>,
    pub event_type: String,
    pub event_time: String,
    pub event_data: Option<serde_json::Value>,
}

impl From<ActivityEvent> for ActivityEventResponse {
    fn from(e: ActivityEvent) -> Self {
        Self {
            id: e.id,
            session_id: e.session_id,
            app_id: e.app_id,
            event_type: e.event_type.as_str().to_string(),
            event_time: e.event_time.to_rfc3339(),
            event_data: e.event_data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppUsageResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub app_id: Uuid,
    pub window_title: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub is_active: bool,
}

impl From<AppUsage> for AppUsageResponse {
    fn from(u: AppUsage) -> Self {
        Self {
            id: u.id,
            session_id: u.session_id,
            app_id: u.app_id,
            window_title: u.window_title,
            start_time: u.start_time.to_rfc3339(),
            end_time: u.end_time.map(|t| t.to_rfc3339()),
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemMetricsResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub cpu_usage: f64,
    pub gpu_usage: f64,
    pub memory_usage: f64,
    pub measurement_time: String,
}

impl From<SystemMetricsSample> for SystemMetricsResponse {
    fn from(s: SystemMetricsSample) -> Self {
        Self {
            id: s.id,
            session_id: s.session_id,
            cpu_usage: s.cpu_usage,
            gpu_usage: s.gpu_usage,
            memory_usage: s.memory_usage,
            measurement_time: s.measurement_time.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionEventResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub event_type: String,
    pub event_time: String,
    pub user_id: Uuid,
    pub previous_user_id: Option<Uuid>,
    pub machine_id: Uuid,
    pub terminal_session_id: Option<String>,
    pub is_remote: bool,
}

impl From<SessionEvent> for SessionEventResponse {
    fn from(e: SessionEvent) -> Self {
        Self {
            id: e.id,
            session_id: e.session_id,
            event_type: e.event_type.as_str().to_string(),
            event_time: e.event_time.to_rfc3339(),
            user_id: e.user_id,
            previous_user_id: e.previous_user_id,
            machine_id: e.machine_id,
            terminal_session_id: e.terminal_session_id,
            is_remote: e.is_remote,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AfkPeriodResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub start_time: String,
    pub end_time: Option<String>,
}

impl From<AfkPeriod> for AfkPeriodResponse {
    fn from(p: AfkPeriod) -> Self {
        Self {
            id: p.id,
            session_id: p.session_id,
            start_time: p.start_time.to_rfc3339(),
            end_time: p.end_time.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self { id: r.id, name: r.name, description: r.description }
    }
}

#[derive(Debug, Serialize)]
pub struct DisciplineResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<Discipline> for DisciplineResponse {
    fn from(d: Discipline) -> Self {
        Self { id: d.id, name: d.name, description: d.description }
    }
}

#[derive(Debug, Serialize)]
pub struct UserRoleDisciplineResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub discipline_id: Uuid,
}

impl From<UserRoleDiscipline> for UserRoleDisciplineResponse {
    fn from(g: UserRoleDiscipline) -> Self {
        Self { id: g.id, user_id: g.user_id, role_id: g.role_id, discipline_id: g.discipline_id }
    }
}
