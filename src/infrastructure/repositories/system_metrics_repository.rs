//! System Metrics Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{SystemMetricsRepository, SystemMetricsSample};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SystemMetricsRow {
    id: Uuid,
    session_id: Uuid,
    cpu_usage: f64,
    gpu_usage: f64,
    memory_usage: f64,
    measurement_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl SystemMetricsRow {
    fn into_sample(self) -> SystemMetricsSample {
        SystemMetricsSample {
            id: self.id,
            session_id: self.session_id,
            cpu_usage: self.cpu_usage,
            gpu_usage: self.gpu_usage,
            memory_usage: self.memory_usage,
            measurement_time: self.measurement_time,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgSystemMetricsRepository {
    pool: PgPool,
}

impl PgSystemMetricsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const METRICS_COLUMNS: &str = "id, session_id, cpu_usage, gpu_usage, memory_usage, \
     measurement_time, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl SystemMetricsRepository for PgSystemMetricsRepository {
    async fn create(
        &self,
        sample: &SystemMetricsSample,
    ) -> Result<SystemMetricsSample, AppError> {
        let row = sqlx::query_as::<_, SystemMetricsRow>(&format!(
            r#"
            INSERT INTO system_metrics (id, session_id, cpu_usage, gpu_usage, memory_usage,
                                         measurement_time, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {METRICS_COLUMNS}
            "#
        ))
        .bind(sample.id)
        .bind(sample.session_id)
        .bind(sample.cpu_usage)
        .bind(sample.gpu_usage)
        .bind(sample.memory_usage)
        .bind(sample.measurement_time)
        .bind(sample.created_at)
        .bind(sample.created_by)
        .bind(sample.updated_at)
        .bind(sample.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_sample())
    }

    async fn list_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SystemMetricsSample>, AppError> {
        let rows = sqlx::query_as::<_, SystemMetricsRow>(&format!(
            "SELECT {METRICS_COLUMNS} FROM system_metrics WHERE session_id = $1 \
             ORDER BY measurement_time ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(SystemMetricsRow::into_sample).collect())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<SystemMetricsSample>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, SystemMetricsRow>(&format!(
            "SELECT {METRICS_COLUMNS} FROM system_metrics ORDER BY measurement_time DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM system_metrics")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((
            rows.into_iter().map(SystemMetricsRow::into_sample).collect(),
            total,
        ))
    }
}
