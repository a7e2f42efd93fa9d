//! Session entity and repository trait.
//!
//! Maps to the `sessions` table. The central mutable entity: a
//! contiguous (possibly reopened) period of a user's presence on one
//! machine on one local calendar day. See
//! `crate::application::services::session_engine` for the state machine
//! that creates, reopens, and closes these.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub machine_id: Uuid,
    pub ip_address: Option<String>,
    pub session_data: Option<Value>,

    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,

    pub continued_from_session: Option<Uuid>,
    pub continued_by_session: Option<Uuid>,
    pub previous_session_end_time: Option<DateTime<Utc>>,
    pub time_since_previous_session: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl Session {
    /// A session with `logout_time` unset is active.
    pub fn is_active(&self) -> bool {
        self.logout_time.is_none()
    }

    /// Last activity timestamp for chain/continuity math: the close time if
    /// closed, otherwise the moment used as "now" by the caller.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.logout_time.unwrap_or(now)
    }

    /// Wall-clock duration of this session alone.
    pub fn duration(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.effective_end(now) - self.login_time
    }
}

/// Repository trait for Session data access operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError>;

    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    async fn update(&self, session: &Session) -> Result<Session, AppError>;

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Session>, i64), AppError>;
}
