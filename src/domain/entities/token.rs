//! Auth token entity and repository trait.
//!
//! Maps to the `auth_tokens` table. The durable record backing the
//! in-memory Token Store (`crate::infrastructure::token_store`); rows here
//! are the source of truth on restart, the store is the fast path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    User,
    Service,
    Api,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Service => "service",
            Self::Api => "api",
            Self::Refresh => "refresh",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "service" => Some(Self::Service),
            "api" => Some(Self::Api),
            "refresh" => Some(Self::Refresh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: Uuid,
    pub token_id: String,
    pub token_type: TokenType,
    pub user_id: Uuid,
    pub token_data: Option<Value>,
    pub device_info: Option<Value>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub revocation_reason: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl Token {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn find_by_token_id(&self, token_id: &str) -> Result<Option<Token>, AppError>;
    async fn create(&self, token: &Token) -> Result<Token, AppError>;
    async fn touch_last_used(&self, token_id: &str) -> Result<(), AppError>;
    async fn revoke(&self, token_id: &str, reason: &str) -> Result<(), AppError>;
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
    /// Refresh an existing token on re-save: bump `expires_at` and clear
    /// any revocation, so a re-issued token string doesn't stay revoked.
    async fn refresh(&self, token_id: &str, expires_at: DateTime<Utc>) -> Result<(), AppError>;
    /// All tokens not revoked and not yet expired, for cache warmup.
    async fn find_active(&self, now: DateTime<Utc>) -> Result<Vec<Token>, AppError>;
}
