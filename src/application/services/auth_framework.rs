//! Auth Framework
//!
//! Extracts credentials from an incoming request, classifies the scheme,
//! validates via the Token Store, and resolves an `Identity`. Endpoints
//! declare a required `AuthLevel`; `authorize` enforces it uniformly so
//! handlers never duplicate the role-checking logic.

use std::sync::Arc;

use axum::http::HeaderMap;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{User, UserRepository};
use crate::infrastructure::token_store::{TokenStore, ValidatedToken};
use crate::domain::TokenType;
use crate::shared::error::AppError;

/// Authorization level an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthLevel {
    /// Runs extraction but permits an absent/invalid credential through;
    /// the handler sees `None` and must treat the request as anonymous.
    None,
    User,
    Admin,
    Superadmin,
}

/// The resolved caller of a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub data: Option<Value>,
}

impl Identity {
    pub fn roles(&self) -> Vec<String> {
        self.data
            .as_ref()
            .and_then(|d| d.get("roles"))
            .and_then(|r| r.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }
}

impl From<ValidatedToken> for Identity {
    fn from(v: ValidatedToken) -> Self {
        Self {
            user_id: v.user_id,
            token_type: v.token_type,
            data: v.data,
        }
    }
}

/// A credential pulled out of a request, tagged with the scheme hint the
/// classifier should use (`None` lets the Token Store classify by prefix).
struct Candidate {
    token: String,
    hint: Option<TokenType>,
}

fn extract_candidate(headers: &HeaderMap) -> Option<Candidate> {
    if let Some(value) = headers.get(axum::http::header::AUTHORIZATION) {
        let raw = value.to_str().ok()?;
        if let Some(token) = raw.strip_prefix("Bearer ") {
            return Some(Candidate { token: token.to_string(), hint: None });
        }
        if let Some(token) = raw.strip_prefix("ServiceToken ") {
            return Some(Candidate {
                token: token.to_string(),
                hint: Some(TokenType::Service),
            });
        }
    }

    if let Some(value) = headers.get("X-API-Key") {
        let raw = value.to_str().ok()?;
        return Some(Candidate {
            token: raw.to_string(),
            hint: Some(TokenType::Api),
        });
    }

    None
}

pub struct AuthFramework {
    token_store: Arc<TokenStore>,
    user_repo: Arc<dyn UserRepository>,
    auto_create_users: bool,
    email_domain: String,
}

impl AuthFramework {
    pub fn new(
        token_store: Arc<TokenStore>,
        user_repo: Arc<dyn UserRepository>,
        auto_create_users: bool,
        email_domain: String,
    ) -> Self {
        Self {
            token_store,
            user_repo,
            auto_create_users,
            email_domain,
        }
    }

    /// Resolve an identity from the request headers, per §4.2's extraction
    /// order: bearer (user/refresh), API key, service token. Returns `Ok(None)`
    /// when no credential is present or the credential fails validation.
    pub async fn identify(&self, headers: &HeaderMap) -> Result<Option<Identity>, AppError> {
        let Some(candidate) = extract_candidate(headers) else {
            return Ok(None);
        };

        match self.token_store.validate(&candidate.token, candidate.hint).await? {
            Some(validated) => {
                tracing::debug!(
                    token_type = validated.token_type.as_str(),
                    user_id = %validated.user_id,
                    "auth: credential accepted"
                );
                Ok(Some(validated.into()))
            }
            None => {
                tracing::warn!("auth: credential rejected");
                Ok(None)
            }
        }
    }

    /// Enforce a required auth level against headers, producing the
    /// identity on success.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        level: AuthLevel,
    ) -> Result<Option<Identity>, AppError> {
        let identity = self.identify(headers).await?;

        match level {
            AuthLevel::None => Ok(identity),
            AuthLevel::User => {
                let identity = identity
                    .ok_or_else(|| AppError::Unauthorized("missing or invalid credential".into()))?;
                Ok(Some(identity))
            }
            AuthLevel::Admin => {
                let identity = identity
                    .ok_or_else(|| AppError::Unauthorized("missing or invalid credential".into()))?;
                if !identity.has_role("admin") && !identity.has_role("superadmin") {
                    return Err(AppError::Forbidden("admin role required".into()));
                }
                Ok(Some(identity))
            }
            AuthLevel::Superadmin => {
                let identity = identity
                    .ok_or_else(|| AppError::Unauthorized("missing or invalid credential".into()))?;
                if !identity.has_role("superadmin") {
                    return Err(AppError::Forbidden("superadmin role required".into()));
                }
                Ok(Some(identity))
            }
        }
    }

    /// Find-or-auto-create a user by username for a service-token-authed
    /// agent, per §4.2.
    pub async fn resolve_user_for_tracking(&self, username: &str) -> Result<User, AppError> {
        if let Some(user) = self.user_repo.find_by_username(username).await? {
            return Ok(user);
        }

        if !self.auto_create_users {
            return Err(AppError::NotFound(format!("user {username} not found")));
        }

        let email = format!("{username}@{}", self.email_domain);
        let random_password_hash = super::auth_service::hash_password(&Uuid::new_v4().to_string())
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let mut user = User::new(username.to_string(), email, random_password_hash);
        user.verified = false;
        let created = self.user_repo.create(&user).await?;
        tracing::info!(username, user_id = %created.id, "auth: auto-created user for tracking");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_with_no_hint() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        let candidate = extract_candidate(&headers).expect("candidate");
        assert_eq!(candidate.token, "abc123");
        assert!(candidate.hint.is_none());
    }

    #[test]
    fn extracts_service_token_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("ServiceToken svc_abc"),
        );
        let candidate = extract_candidate(&headers).expect("candidate");
        assert_eq!(candidate.hint, Some(TokenType::Service));
    }

    #[test]
    fn extracts_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", HeaderValue::from_static("apk_xyz"));
        let candidate = extract_candidate(&headers).expect("candidate");
        assert_eq!(candidate.hint, Some(TokenType::Api));
    }

    #[test]
    fn no_credential_present() {
        let headers = HeaderMap::new();
        assert!(extract_candidate(&headers).is_none());
    }

    #[test]
    fn identity_extracts_roles_from_token_data() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            token_type: TokenType::User,
            data: Some(serde_json::json!({"roles": ["admin", "reporter"]})),
        };
        assert!(identity.has_role("admin"));
        assert!(!identity.has_role("superadmin"));
    }
}
