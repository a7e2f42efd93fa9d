//! Session event entity and repository trait.
//!
//! Maps to the `session_events` table — OS-level transitions such as
//! login/logout/lock/unlock/remote connect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventType {
    Login,
    Logout,
    Lock,
    Unlock,
    SwitchUser,
    RemoteConnect,
    RemoteDisconnect,
}

impl SessionEventType {
    pub fn default_kind() -> Self {
        Self::Login
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "lock" => Some(Self::Lock),
            "unlock" => Some(Self::Unlock),
            "switch_user" => Some(Self::SwitchUser),
            "remote_connect" => Some(Self::RemoteConnect),
            "remote_disconnect" => Some(Self::RemoteDisconnect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::SwitchUser => "switch_user",
            Self::RemoteConnect => "remote_connect",
            Self::RemoteDisconnect => "remote_disconnect",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub id: Uuid,
    pub session_id: Uuid,
    pub event_type: SessionEventType,
    pub event_time: DateTime<Utc>,
    pub user_id: Uuid,
    pub previous_user_id: Option<Uuid>,
    pub machine_id: Uuid,
    pub terminal_session_id: Option<String>,
    pub is_remote: bool,
    pub event_data: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait SessionEventRepository: Send + Sync {
    async fn create(&self, event: &SessionEvent) -> Result<SessionEvent, AppError>;
    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<SessionEvent>, AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<SessionEvent>, i64), AppError>;
}
