//! Activity Event Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{ActivityEvent, ActivityEventRepository, ActivityEventType};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ActivityEventRow {
    id: Uuid,
    session_id: Uuid,
    app_id: Option<Uuid>,
    event_type: String,
    event_time: DateTime<Utc>,
    event_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl ActivityEventRow {
    fn into_event(self) -> ActivityEvent {
        ActivityEvent {
            id: self.id,
            session_id: self.session_id,
            app_id: self.app_id,
            event_type: ActivityEventType::parse(&self.event_type)
                .unwrap_or_else(ActivityEventType::default_kind),
            event_time: self.event_time,
            event_data: self.event_data,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgActivityEventRepository {
    pool: PgPool,
}

impl PgActivityEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACTIVITY_COLUMNS: &str = "id, session_id, app_id, event_type, event_time, event_data, \
     created_at, created_by, updated_at, updated_by";

#[async_trait]
impl ActivityEventRepository for PgActivityEventRepository {
    async fn create(&self, event: &ActivityEvent) -> Result<ActivityEvent, AppError> {
        let row = sqlx::query_as::<_, ActivityEventRow>(&format!(
            r#"
            INSERT INTO activity_events (id, session_id, app_id, event_type, event_time,
                                          event_data, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(event.session_id)
        .bind(event.app_id)
        .bind(event.event_type.as_str())
        .bind(event.event_time)
        .bind(&event.event_data)
        .bind(event.created_at)
        .bind(event.created_by)
        .bind(event.updated_at)
        .bind(event.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_event())
    }

    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<ActivityEvent>, AppError> {
        let rows = sqlx::query_as::<_, ActivityEventRow>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_events WHERE session_id = $1 \
             ORDER BY event_time ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(ActivityEventRow::into_event).collect())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<ActivityEvent>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, ActivityEventRow>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_events ORDER BY event_time DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activity_events")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((rows.into_iter().map(ActivityEventRow::into_event).collect(), total))
    }
}
