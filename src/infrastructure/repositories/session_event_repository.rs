//! Session Event Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{SessionEvent, SessionEventRepository, SessionEventType};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SessionEventRow {
    id: Uuid,
    session_id: Uuid,
    event_type: String,
    event_time: DateTime<Utc>,
    user_id: Uuid,
    previous_user_id: Option<Uuid>,
    machine_id: Uuid,
    terminal_session_id: Option<String>,
    is_remote: bool,
    event_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl SessionEventRow {
    fn into_event(self) -> SessionEvent {
        SessionEvent {
            id: self.id,
            session_id: self.session_id,
            event_type: SessionEventType::parse(&self.event_type)
                .unwrap_or_else(SessionEventType::default_kind),
            event_time: self.event_time,
            user_id: self.user_id,
            previous_user_id: self.previous_user_id,
            machine_id: self.machine_id,
            terminal_session_id: self.terminal_session_id,
            is_remote: self.is_remote,
            event_data: self.event_data,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgSessionEventRepository {
    pool: PgPool,
}

impl PgSessionEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SESSION_EVENT_COLUMNS: &str = "id, session_id, event_type, event_time, user_id, \
     previous_user_id, machine_id, terminal_session_id, is_remote, event_data, created_at, \
     created_by, updated_at, updated_by";

#[async_trait]
impl SessionEventRepository for PgSessionEventRepository {
    async fn create(&self, event: &SessionEvent) -> Result<SessionEvent, AppError> {
        let row = sqlx::query_as::<_, SessionEventRow>(&format!(
            r#"
            INSERT INTO session_events (
                id, session_id, event_type, event_time, user_id, previous_user_id, machine_id,
                terminal_session_id, is_remote, event_data, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {SESSION_EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(event.session_id)
        .bind(event.event_type.as_str())
        .bind(event.event_time)
        .bind(event.user_id)
        .bind(event.previous_user_id)
        .bind(event.machine_id)
        .bind(&event.terminal_session_id)
        .bind(event.is_remote)
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

    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<SessionEvent>, AppError> {
        let rows = sqlx::query_as::<_, SessionEventRow>(&format!(
            "SELECT {SESSION_EVENT_COLUMNS} FROM session_events WHERE session_id = $1 \
             ORDER BY event_time ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(SessionEventRow::into_event).collect())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<SessionEvent>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, SessionEventRow>(&format!(
            "SELECT {SESSION_EVENT_COLUMNS} FROM session_events ORDER BY event_time DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM session_events")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((rows.into_iter().map(SessionEventRow::into_event).collect(), total))
    }
}
