//! Discipline Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Discipline, DisciplineRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct DisciplineRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl DisciplineRow {
    fn into_discipline(self) -> Discipline {
        Discipline {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgDisciplineRepository {
    pool: PgPool,
}

impl PgDisciplineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DISCIPLINE_COLUMNS: &str =
    "id, name, description, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl DisciplineRepository for PgDisciplineRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Discipline>, AppError> {
        let row = sqlx::query_as::<_, DisciplineRow>(&format!(
            "SELECT {DISCIPLINE_COLUMNS} FROM disciplines WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(DisciplineRow::into_discipline))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Discipline>, AppError> {
        let row = sqlx::query_as::<_, DisciplineRow>(&format!(
            "SELECT {DISCIPLINE_COLUMNS} FROM disciplines WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(DisciplineRow::into_discipline))
    }

    async fn create(&self, discipline: &Discipline) -> Result<Discipline, AppError> {
        let row = sqlx::query_as::<_, DisciplineRow>(&format!(
            r#"
            INSERT INTO disciplines (id, name, description, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DISCIPLINE_COLUMNS}
            "#
        ))
        .bind(discipline.id)
        .bind(&discipline.name)
        .bind(&discipline.description)
        .bind(discipline.created_at)
        .bind(discipline.created_by)
        .bind(discipline.updated_at)
        .bind(discipline.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_discipline())
    }

    async fn update(&self, discipline: &Discipline) -> Result<Discipline, AppError> {
        let row = sqlx::query_as::<_, DisciplineRow>(&format!(
            r#"
            UPDATE disciplines SET name = $2, description = $3, updated_at = NOW(), updated_by = $4
            WHERE id = $1
            RETURNING {DISCIPLINE_COLUMNS}
            "#
        ))
        .bind(discipline.id)
        .bind(&discipline.name)
        .bind(&discipline.description)
        .bind(discipline.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?
        .ok_or_else(|| AppError::NotFound(format!("discipline {} not found", discipline.id)))?;

        Ok(row.into_discipline())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM disciplines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("discipline {id} not found")));
        }

        Ok(())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Discipline>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, DisciplineRow>(&format!(
            "SELECT {DISCIPLINE_COLUMNS} FROM disciplines ORDER BY name ASC LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM disciplines")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((
            rows.into_iter().map(DisciplineRow::into_discipline).collect(),
            total,
        ))
    }
}
