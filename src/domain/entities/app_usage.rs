//! App usage entity and repository trait.
//!
//! Maps to the `app_usages` table — a focus interval for one application
//! window. An app usage row with no explicit activity flag is assumed to
//! represent the focused window at the time it was recorded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUsage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub app_id: Uuid,
    pub window_title: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait AppUsageRepository: Send + Sync {
    async fn create(&self, usage: &AppUsage) -> Result<AppUsage, AppError>;
    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<AppUsage>, AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<AppUsage>, i64), AppError>;
}
