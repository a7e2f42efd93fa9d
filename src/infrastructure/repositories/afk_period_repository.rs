//! AFK Period Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AfkPeriod, AfkPeriodRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct AfkPeriodRow {
    id: Uuid,
    session_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl AfkPeriodRow {
    fn into_period(self) -> AfkPeriod {
        AfkPeriod {
            id: self.id,
            session_id: self.session_id,
            start_time: self.start_time,
            end_time: self.end_time,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgAfkPeriodRepository {
    pool: PgPool,
}

impl PgAfkPeriodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const AFK_COLUMNS: &str =
    "id, session_id, start_time, end_time, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl AfkPeriodRepository for PgAfkPeriodRepository {
    async fn create(&self, period: &AfkPeriod) -> Result<AfkPeriod, AppError> {
        let row = sqlx::query_as::<_, AfkPeriodRow>(&format!(
            r#"
            INSERT INTO afk_periods (id, session_id, start_time, end_time, created_at,
                                      created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {AFK_COLUMNS}
            "#
        ))
        .bind(period.id)
        .bind(period.session_id)
        .bind(period.start_time)
        .bind(period.end_time)
        .bind(period.created_at)
        .bind(period.created_by)
        .bind(period.updated_at)
        .bind(period.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_period())
    }

    async fn update(&self, period: &AfkPeriod) -> Result<AfkPeriod, AppError> {
        let row = sqlx::query_as::<_, AfkPeriodRow>(&format!(
            r#"
            UPDATE afk_periods
            SET end_time = $2, updated_at = NOW(), updated_by = $3
            WHERE id = $1
            RETURNING {AFK_COLUMNS}
            "#
        ))
        .bind(period.id)
        .bind(period.end_time)
        .bind(period.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?
        .ok_or_else(|| AppError::NotFound(format!("afk period {} not found", period.id)))?;

        Ok(row.into_period())
    }

    async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<AfkPeriod>, AppError> {
        let rows = sqlx::query_as::<_, AfkPeriodRow>(&format!(
            "SELECT {AFK_COLUMNS} FROM afk_periods WHERE session_id = $1 ORDER BY start_time ASC"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(AfkPeriodRow::into_period).collect())
    }
}
