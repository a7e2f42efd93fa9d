//! User-Role-Discipline Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{UserRoleDiscipline, UserRoleDisciplineRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct UserRoleDisciplineRow {
    id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
    discipline_id: Uuid,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl UserRoleDisciplineRow {
    fn into_grant(self) -> UserRoleDiscipline {
        UserRoleDiscipline {
            id: self.id,
            user_id: self.user_id,
            role_id: self.role_id,
            discipline_id: self.discipline_id,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgUserRoleDisciplineRepository {
    pool: PgPool,
}

impl PgUserRoleDisciplineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const URD_COLUMNS: &str =
    "id, user_id, role_id, discipline_id, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl UserRoleDisciplineRepository for PgUserRoleDisciplineRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRoleDiscipline>, AppError> {
        let row = sqlx::query_as::<_, UserRoleDisciplineRow>(&format!(
            "SELECT {URD_COLUMNS} FROM user_role_disciplines WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(UserRoleDisciplineRow::into_grant))
    }

    async fn create(
        &self,
        grant: &UserRoleDiscipline,
    ) -> Result<UserRoleDiscipline, AppError> {
        let row = sqlx::query_as::<_, UserRoleDisciplineRow>(&format!(
            r#"
            INSERT INTO user_role_disciplines (id, user_id, role_id, discipline_id, created_at,
                                                created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {URD_COLUMNS}
            "#
        ))
        .bind(grant.id)
        .bind(grant.user_id)
        .bind(grant.role_id)
        .bind(grant.discipline_id)
        .bind(grant.created_at)
        .bind(grant.created_by)
        .bind(grant.updated_at)
        .bind(grant.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_grant())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_role_disciplines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("grant {id} not found")));
        }

        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserRoleDiscipline>, AppError> {
        let rows = sqlx::query_as::<_, UserRoleDisciplineRow>(&format!(
            "SELECT {URD_COLUMNS} FROM user_role_disciplines WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(UserRoleDisciplineRow::into_grant).collect())
    }

    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT r.name
            FROM user_role_disciplines urd
            JOIN roles r ON r.id = urd.role_id
            WHERE urd.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(names)
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<UserRoleDiscipline>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, UserRoleDisciplineRow>(&format!(
            "SELECT {URD_COLUMNS} FROM user_role_disciplines ORDER BY created_at DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_role_disciplines")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((
            rows.into_iter().map(UserRoleDisciplineRow::into_grant).collect(),
            total,
        ))
    }
}
