//! Session Repository Implementation
//!
//! PostgreSQL implementation of the SessionRepository trait, backing the
//! continuity-chain model the Session Engine operates on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Session, SessionRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    machine_id: Uuid,
    ip_address: Option<String>,
    session_data: Option<serde_json::Value>,
    login_time: DateTime<Utc>,
    logout_time: Option<DateTime<Utc>>,
    continued_from_session: Option<Uuid>,
    continued_by_session: Option<Uuid>,
    previous_session_end_time: Option<DateTime<Utc>>,
    time_since_previous_session: Option<i64>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            machine_id: self.machine_id,
            ip_address: self.ip_address,
            session_data: self.session_data,
            login_time: self.login_time,
            logout_time: self.logout_time,
            continued_from_session: self.continued_from_session,
            continued_by_session: self.continued_by_session,
            previous_session_end_time: self.previous_session_end_time,
            time_since_previous_session: self.time_since_previous_session,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SESSION_COLUMNS: &str = "id, user_id, machine_id, ip_address, session_data, login_time, \
     logout_time, continued_from_session, continued_by_session, previous_session_end_time, \
     time_since_previous_session, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            INSERT INTO sessions (
                id, user_id, machine_id, ip_address, session_data, login_time, logout_time,
                continued_from_session, continued_by_session, previous_session_end_time,
                time_since_previous_session, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.machine_id)
        .bind(&session.ip_address)
        .bind(&session.session_data)
        .bind(session.login_time)
        .bind(session.logout_time)
        .bind(session.continued_from_session)
        .bind(session.continued_by_session)
        .bind(session.previous_session_end_time)
        .bind(session.time_since_previous_session)
        .bind(session.created_at)
        .bind(session.created_by)
        .bind(session.updated_at)
        .bind(session.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_session())
    }

    async fn update(&self, session: &Session) -> Result<Session, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            r#"
            UPDATE sessions
            SET ip_address = $2, session_data = $3, logout_time = $4,
                continued_by_session = $5, updated_at = NOW(), updated_by = $6
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session.id)
        .bind(&session.ip_address)
        .bind(&session.session_data)
        .bind(session.logout_time)
        .bind(session.continued_by_session)
        .bind(session.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?
        .ok_or_else(|| AppError::NotFound(format!("session {} not found", session.id)))?;

        Ok(row.into_session())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Session>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY login_time DESC LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((rows.into_iter().map(SessionRow::into_session).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require a live Postgres instance; see tests/common.
}
