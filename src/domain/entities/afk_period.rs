//! AFK period entity and repository trait.
//!
//! Maps to the `afk_periods` table. Opened by the Activity Event Writer
//! on an `afk_start` event, closed on the matching `afk_end`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AfkPeriod {
    pub id: Uuid,
    pub session_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl AfkPeriod {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[async_trait]
pub trait AfkPeriodRepository: Send + Sync {
    async fn create(&self, period: &AfkPeriod) -> Result<AfkPeriod, AppError>;
    async fn update(&self, period: &AfkPeriod) -> Result<AfkPeriod, AppError>;
    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<AfkPeriod>, AppError>;
}
