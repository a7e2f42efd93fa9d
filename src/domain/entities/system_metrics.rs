//! System metrics sample entity and repository trait.
//!
//! Maps to the `system_metrics` table. Percentages are clamped to
//! `[0, 100]` by the writer before persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMetricsSample {
    pub id: Uuid,
    pub session_id: Uuid,
    pub cpu_usage: f64,
    pub gpu_usage: f64,
    pub memory_usage: f64,
    pub measurement_time: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait SystemMetricsRepository: Send + Sync {
    async fn create(
        &self,
        sample: &SystemMetricsSample,
    ) -> Result<SystemMetricsSample, AppError>;
    async fn list_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SystemMetricsSample>, AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<SystemMetricsSample>, i64), AppError>;
}
