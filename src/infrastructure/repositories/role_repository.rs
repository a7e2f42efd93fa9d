//! Role Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Role, RoleRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl RoleRow {
    fn into_role(self) -> Role {
        Role {
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
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ROLE_COLUMNS: &str = "id, name, description, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(RoleRow::into_role))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(RoleRow::into_role))
    }

    async fn create(&self, role: &Role) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            INSERT INTO roles (id, name, description, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.created_at)
        .bind(role.created_by)
        .bind(role.updated_at)
        .bind(role.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_role())
    }

    async fn update(&self, role: &Role) -> Result<Role, AppError> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            UPDATE roles SET name = $2, description = $3, updated_at = NOW(), updated_by = $4
            WHERE id = $1
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?
        .ok_or_else(|| AppError::NotFound(format!("role {} not found", role.id)))?;

        Ok(row.into_role())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role {id} not found")));
        }

        Ok(())
    }

    async fn get_all_paginated(&self, page: i64, size: i64) -> Result<(Vec<Role>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY name ASC LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((rows.into_iter().map(RoleRow::into_role).collect(), total))
    }
}
