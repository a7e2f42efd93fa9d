//! App Usage Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AppUsage, AppUsageRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct AppUsageRow {
    id: Uuid,
    session_id: Uuid,
    app_id: Uuid,
    window_title: Option<String>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl AppUsageRow {
    fn into_usage(self) -> AppUsage {
        AppUsage {
            id: self.id,
            session_id: self.session_id,
            app_id: self.app_id,
            window_title: self.window_title,
            start_time: self.start_time,
            end_time: self.end_time,
            is_active: self.is_active,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgAppUsageRepository {
    pool: PgPool,
}

impl PgAppUsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const APP_USAGE_COLUMNS: &str = "id, session_id, app_id, window_title, start_time, end_time, \
     is_active, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl AppUsageRepository for PgAppUsageRepository {
    async fn create(&self, usage: &AppUsage) -> Result<AppUsage, AppError> {
        let row = sqlx::query_as::<_, AppUsageRow>(&format!(
            r#"
            INSERT INTO app_usages (id, session_id, app_id, window_title, start_time, end_time,
                                     is_active, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {APP_USAGE_COLUMNS}
            "#
        ))
        .bind(usage.id)
        .bind(usage.session_id)
        .bind(usage.app_id)
        .bind(&usage.window_title)
        .bind(usage.start_time)
        .bind(usage.end_time)
        .bind(usage.is_active)
        .bind(usage.created_at)
        .bind(usage.created_by)
        .bind(usage.updated_at)
        .bind(usage.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_usage())
    }

    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<AppUsage>, AppError> {
        let rows = sqlx::query_as::<_, AppUsageRow>(&format!(
            "SELECT {APP_USAGE_COLUMNS} FROM app_usages WHERE session_id = $1 \
             ORDER BY start_time ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(AppUsageRow::into_usage).collect())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<AppUsage>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, AppUsageRow>(&format!(
            "SELECT {APP_USAGE_COLUMNS} FROM app_usages ORDER BY start_time DESC LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM app_usages")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((rows.into_iter().map(AppUsageRow::into_usage).collect(), total))
    }
}
