//! Token Store
//!
//! An in-memory cache of valid auth tokens backed by the `auth_tokens`
//! table (`crate::infrastructure::repositories::token_repository`). The
//! database is the source of truth; the cache is populated at boot and
//! refreshed on miss, trading a small staleness window for avoiding a
//! database round trip on every authenticated request.
//!
//! Shaped after the teacher's Redis-backed cache traits (typed get/set/
//! delete behind a small struct) but implemented with
//! `parking_lot::RwLock<HashMap<..>>` since there is no remaining use for
//! a distributed cache once real-time push (WebSocket) is out of scope.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::RngCore;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::{Token, TokenRepository, TokenType};
use crate::shared::error::AppError;

/// A token as held in memory; a trimmed projection of `Token`.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub data: Option<Value>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

impl From<&Token> for CachedToken {
    fn from(t: &Token) -> Self {
        Self {
            user_id: t.user_id,
            token_type: t.token_type,
            data: t.token_data.clone(),
            expires_at: t.expires_at,
            revoked: t.revoked,
            last_used_at: t.last_used_at,
        }
    }
}

/// The resolved identity behind a successfully validated token.
#[derive(Debug, Clone)]
pub struct ValidatedToken {
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub data: Option<Value>,
}

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

type TokenMap = RwLock<HashMap<String, CachedToken>>;

/// Four reader-writer-guarded maps, one per token kind, plus the
/// repository that backs them.
pub struct TokenStore {
    user: TokenMap,
    service: TokenMap,
    refresh: TokenMap,
    api_key: TokenMap,
    repo: Arc<dyn TokenRepository>,
}

/// Classify a token string / payload pair per §4.1's classifier:
/// `rt_` prefix is refresh, `apk_` prefix is API key, a `service_id` key
/// in the payload without either prefix is a service token, else user.
fn classify(token_string: &str, token_type_hint: Option<TokenType>) -> TokenType {
    if let Some(hint) = token_type_hint {
        return hint;
    }
    if token_string.starts_with("rt_") {
        TokenType::Refresh
    } else if token_string.starts_with("apk_") {
        TokenType::Api
    } else {
        TokenType::User
    }
}

impl TokenStore {
    pub fn new(repo: Arc<dyn TokenRepository>) -> Self {
        Self {
            user: RwLock::new(HashMap::new()),
            service: RwLock::new(HashMap::new()),
            refresh: RwLock::new(HashMap::new()),
            api_key: RwLock::new(HashMap::new()),
            repo,
        }
    }

    fn map_for(&self, kind: TokenType) -> &TokenMap {
        match kind {
            TokenType::User => &self.user,
            TokenType::Service => &self.service,
            TokenType::Refresh => &self.refresh,
            TokenType::Api => &self.api_key,
        }
    }

    /// Generate a token string: hex(SHA-256(serialized(data) XOR nonce)),
    /// with the type tag prepended for refresh/API-key variants.
    pub fn generate_token(kind: TokenType, token_data: &Value) -> String {
        let serialized = serde_json::to_vec(token_data).unwrap_or_default();
        let mut nonce = vec![0u8; serialized.len().max(32)];
        rand::thread_rng().fill_bytes(&mut nonce);

        let xored: Vec<u8> = serialized
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ nonce[i % nonce.len()])
            .collect();

        let mut hasher = Sha256::new();
        hasher.update(&xored);
        hasher.update(&nonce);
        let hex = to_hex(&hasher.finalize());

        match kind {
            TokenType::Refresh => format!("rt_{hex}"),
            TokenType::Api => format!("apk_{hex}"),
            TokenType::User | TokenType::Service => hex,
        }
    }

    /// Persist a new token and seed the cache. On conflict (token string
    /// already present), refresh its expiry and clear any revocation.
    pub async fn save(
        &self,
        token_string: &str,
        kind: TokenType,
        user_id: Uuid,
        data: Option<Value>,
        expires_at: DateTime<Utc>,
        created_by: Option<Uuid>,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        if self.repo.find_by_token_id(token_string).await?.is_some() {
            self.repo.refresh(token_string, expires_at).await?;
        } else {
            let token = Token {
                id: Uuid::new_v4(),
                token_id: token_string.to_string(),
                token_type: kind,
                user_id,
                token_data: data.clone(),
                device_info: None,
                expires_at,
                revoked: false,
                revocation_reason: None,
                last_used_at: None,
                created_at: now,
                created_by,
                updated_at: now,
                updated_by: created_by,
            };
            self.repo.create(&token).await?;
        }

        self.map_for(kind).write().insert(
            token_string.to_string(),
            CachedToken {
                user_id,
                token_type: kind,
                data,
                expires_at,
                revoked: false,
                last_used_at: None,
            },
        );

        Ok(())
    }

    /// Validate a token against a type hint (the scheme the caller extracted
    /// it under), consulting the cache first and falling back to the
    /// database on a miss.
    pub async fn validate(
        &self,
        token_string: &str,
        type_hint: Option<TokenType>,
    ) -> Result<Option<ValidatedToken>, AppError> {
        let now = Utc::now();
        let kind = classify(token_string, type_hint);

        {
            let map = self.map_for(kind).read();
            if let Some(cached) = map.get(token_string) {
                if cached.is_valid(now) {
                    let validated = ValidatedToken {
                        user_id: cached.user_id,
                        token_type: cached.token_type,
                        data: cached.data.clone(),
                    };
                    drop(map);
                    self.map_for(kind)
                        .write()
                        .entry(token_string.to_string())
                        .and_modify(|c| c.last_used_at = Some(now));
                    tracing::debug!(token_type = kind.as_str(), "token validated from cache");
                    return Ok(Some(validated));
                }
                if cached.expires_at <= now {
                    drop(map);
                    self.map_for(kind).write().remove(token_string);
                    return Ok(None);
                }
            }
        }

        match self.repo.find_by_token_id(token_string).await? {
            Some(token) if token.is_valid(now) => {
                self.map_for(token.token_type)
                    .write()
                    .insert(token_string.to_string(), CachedToken::from(&token));
                let _ = self.repo.touch_last_used(token_string).await;
                Ok(Some(ValidatedToken {
                    user_id: token.user_id,
                    token_type: token.token_type,
                    data: token.token_data,
                }))
            }
            _ => Ok(None),
        }
    }

    pub async fn revoke(&self, token_string: &str, reason: &str) -> Result<(), AppError> {
        self.repo.revoke(token_string, reason).await?;
        for kind in [TokenType::User, TokenType::Service, TokenType::Refresh, TokenType::Api] {
            self.map_for(kind).write().remove(token_string);
        }
        tracing::info!(reason, "token revoked");
        Ok(())
    }

    /// Populate the cache from the database, called once at startup, per
    /// §4.1's "populates in-memory cache split by type" boot contract.
    pub async fn load_active(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        let active = self.repo.find_active(now).await?;
        let count = active.len();

        for token in &active {
            self.map_for(token.token_type)
                .write()
                .insert(token.token_id.clone(), CachedToken::from(token));
        }

        tracing::info!(count, "token store cache warmed from database");
        Ok(count)
    }

    /// Delete expired tokens from storage and evict matching cache
    /// entries. Returns the number of rows deleted.
    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        let now = Utc::now();
        let deleted = self.repo.delete_expired_before(now).await?;

        for kind in [TokenType::User, TokenType::Service, TokenType::Refresh, TokenType::Api] {
            self.map_for(kind).write().retain(|_, c| c.expires_at > now);
        }

        crate::infrastructure::metrics::TOKEN_SWEEP_DELETED_TOTAL.inc_by(deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_prefix() {
        assert_eq!(classify("rt_abc123", None), TokenType::Refresh);
        assert_eq!(classify("apk_abc123", None), TokenType::Api);
        assert_eq!(classify("abc123", None), TokenType::User);
    }

    #[test]
    fn generate_token_respects_prefix() {
        let data = serde_json::json!({"user_id": "abc"});
        let refresh = TokenStore::generate_token(TokenType::Refresh, &data);
        let api = TokenStore::generate_token(TokenType::Api, &data);
        let user = TokenStore::generate_token(TokenType::User, &data);
        assert!(refresh.starts_with("rt_"));
        assert!(api.starts_with("apk_"));
        assert!(!user.starts_with("rt_") && !user.starts_with("apk_"));
    }

    #[test]
    fn generate_token_is_not_deterministic() {
        let data = serde_json::json!({"user_id": "abc"});
        let a = TokenStore::generate_token(TokenType::User, &data);
        let b = TokenStore::generate_token(TokenType::User, &data);
        assert_ne!(a, b);
    }
}
