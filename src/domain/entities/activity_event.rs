//! Activity event entity and repository trait.
//!
//! Maps to the `activity_events` table — discrete keyboard/mouse/focus
//! observations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::error::AppError;

/// `event_type` values recognized by the Activity Event Writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEventType {
    MouseClick,
    MouseMove,
    Keyboard,
    AfkStart,
    AfkEnd,
    AppFocus,
    AppUnfocus,
}

impl ActivityEventType {
    /// The writer's default when an unknown string is supplied.
    pub fn default_kind() -> Self {
        Self::MouseClick
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "mouse_click" => Some(Self::MouseClick),
            "mouse_move" => Some(Self::MouseMove),
            "keyboard" => Some(Self::Keyboard),
            "afk_start" => Some(Self::AfkStart),
            "afk_end" => Some(Self::AfkEnd),
            "app_focus" => Some(Self::AppFocus),
            "app_unfocus" => Some(Self::AppUnfocus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MouseClick => "mouse_click",
            Self::MouseMove => "mouse_move",
            Self::Keyboard => "keyboard",
            Self::AfkStart => "afk_start",
            Self::AfkEnd => "afk_end",
            Self::AppFocus => "app_focus",
            Self::AppUnfocus => "app_unfocus",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub session_id: Uuid,
    pub app_id: Option<Uuid>,
    pub event_type: ActivityEventType,
    pub event_time: DateTime<Utc>,
    pub event_data: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait ActivityEventRepository: Send + Sync {
    async fn create(&self, event: &ActivityEvent) -> Result<ActivityEvent, AppError>;
    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<ActivityEvent>, AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<ActivityEvent>, i64), AppError>;
}
