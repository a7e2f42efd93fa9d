//! Token Repository Implementation
//!
//! The durable ledger behind the in-memory Token Store
//! (`crate::infrastructure::token_store`) — rows here survive a restart,
//! the store is the fast path consulted on every request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Token, TokenRepository, TokenType};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    id: Uuid,
    token_id: String,
    token_type: String,
    user_id: Uuid,
    token_data: Option<serde_json::Value>,
    device_info: Option<serde_json::Value>,
    expires_at: DateTime<Utc>,
    revoked: bool,
    revocation_reason: Option<String>,
    last_used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl TokenRow {
    fn into_token(self) -> Token {
        Token {
            id: self.id,
            token_id: self.token_id,
            token_type: TokenType::parse(&self.token_type).unwrap_or(TokenType::User),
            user_id: self.user_id,
            token_data: self.token_data,
            device_info: self.device_info,
            expires_at: self.expires_at,
            revoked: self.revoked,
            revocation_reason: self.revocation_reason,
            last_used_at: self.last_used_at,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TOKEN_COLUMNS: &str = "id, token_id, token_type, user_id, token_data, device_info, \
     expires_at, revoked, revocation_reason, last_used_at, created_at, created_by, updated_at, \
     updated_by";

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn find_by_token_id(&self, token_id: &str) -> Result<Option<Token>, AppError> {
        let row = sqlx::query_as::<_, TokenRow>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM auth_tokens WHERE token_id = $1"
        ))
        .bind(token_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(TokenRow::into_token))
    }

    async fn create(&self, token: &Token) -> Result<Token, AppError> {
        let row = sqlx::query_as::<_, TokenRow>(&format!(
            r#"
            INSERT INTO auth_tokens (
                id, token_id, token_type, user_id, token_data, device_info, expires_at,
                revoked, revocation_reason, last_used_at, created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {TOKEN_COLUMNS}
            "#
        ))
        .bind(token.id)
        .bind(&token.token_id)
        .bind(token.token_type.as_str())
        .bind(token.user_id)
        .bind(&token.token_data)
        .bind(&token.device_info)
        .bind(token.expires_at)
        .bind(token.revoked)
        .bind(&token.revocation_reason)
        .bind(token.last_used_at)
        .bind(token.created_at)
        .bind(token.created_by)
        .bind(token.updated_at)
        .bind(token.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_token())
    }

    async fn touch_last_used(&self, token_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE auth_tokens SET last_used_at = NOW() WHERE token_id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok(())
    }

    async fn revoke(&self, token_id: &str, reason: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE auth_tokens SET revoked = TRUE, revocation_reason = $2 WHERE token_id = $1",
        )
        .bind(token_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("token {token_id} not found")));
        }

        Ok(())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok(result.rows_affected())
    }

    async fn refresh(&self, token_id: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE auth_tokens SET expires_at = $2, revoked = FALSE, revocation_reason = NULL, \
             last_used_at = NOW() WHERE token_id = $1",
        )
        .bind(token_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("token {token_id} not found")));
        }

        Ok(())
    }

    async fn find_active(&self, now: DateTime<Utc>) -> Result<Vec<Token>, AppError> {
        let rows = sqlx::query_as::<_, TokenRow>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM auth_tokens WHERE revoked = FALSE AND expires_at > $1"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(rows.into_iter().map(TokenRow::into_token).collect())
    }
}
