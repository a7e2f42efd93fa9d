//! Authentication Service
//!
//! Login, registration, refresh, and logout, issuing opaque tokens through
//! the Token Store instead of JWTs (see `crate::infrastructure::token_store`).

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;

use crate::config::AuthSettings;
use crate::domain::{TokenType, User, UserRepository, UserRoleDisciplineRepository};
use crate::infrastructure::token_store::TokenStore;
use crate::shared::error::AppError;

/// Hash a password using Argon2id.
pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against its Argon2id hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A user token + refresh token pair returned from login/register/refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: &'static str,
}

pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    urd_repo: Arc<dyn UserRoleDisciplineRepository>,
    token_store: Arc<TokenStore>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        urd_repo: Arc<dyn UserRoleDisciplineRepository>,
        token_store: Arc<TokenStore>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            user_repo,
            urd_repo,
            token_store,
            settings,
        }
    }

    async fn roles_for(&self, user_id: uuid::Uuid) -> Result<Vec<String>, AppError> {
        self.urd_repo.roles_for_user(user_id).await
    }

    /// Issue a fresh user token + refresh token pair for `user`, baking its
    /// current roles into the token payload per the Authorization Taxonomy.
    async fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let roles = self.roles_for(user.id).await?;
        let now = Utc::now();

        let user_payload = json!({
            "user_id": user.id,
            "username": user.username,
            "roles": roles,
        });
        let user_token = TokenStore::generate_token(TokenType::User, &user_payload);
        let user_expires = now + Duration::hours(self.settings.user_token_expiry_hours);
        self.token_store
            .save(
                &user_token,
                TokenType::User,
                user.id,
                Some(user_payload),
                user_expires,
                Some(user.id),
            )
            .await?;

        let refresh_payload = json!({ "user_id": user.id });
        let refresh_token = TokenStore::generate_token(TokenType::Refresh, &refresh_payload);
        let refresh_expires = now + Duration::days(self.settings.refresh_token_expiry_days);
        self.token_store
            .save(
                &refresh_token,
                TokenType::Refresh,
                user.id,
                Some(refresh_payload),
                refresh_expires,
                Some(user.id),
            )
            .await?;

        tracing::info!(user_id = %user.id, "auth: issued token pair");

        Ok(TokenPair {
            access_token: user_token,
            refresh_token,
            expires_in: (user_expires - now).num_seconds(),
            token_type: "Bearer",
        })
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, TokenPair), AppError> {
        if self.user_repo.username_exists(username).await? {
            return Err(AppError::Conflict("username already exists".into()));
        }
        if self.user_repo.email_exists(email).await? {
            return Err(AppError::Conflict("email already exists".into()));
        }

        let password_hash = hash_password(password)?;
        let user = User::new(username.to_string(), email.to_string(), password_hash);
        let created = self.user_repo.create(&user).await?;

        let tokens = self.issue_pair(&created).await?;
        Ok((created, tokens))
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid username or password".into()))?;

        if !user.active {
            return Err(AppError::Unauthorized("account is not active".into()));
        }

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(username, "auth: login failed, bad password");
            return Err(AppError::Unauthorized("invalid username or password".into()));
        }

        tracing::info!(username, user_id = %user.id, "auth: login succeeded");
        self.issue_pair(&user).await
    }

    /// `POST /api/auth/refresh`. Revokes the presented refresh token with
    /// reason "used for refresh" and issues a brand new pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let validated = self
            .token_store
            .validate(refresh_token, Some(TokenType::Refresh))
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid or expired refresh token".into()))?;

        let user = self
            .user_repo
            .find_by_id(validated.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("user no longer exists".into()))?;

        self.token_store.revoke(refresh_token, "used for refresh").await?;
        tracing::info!(user_id = %user.id, "auth: refresh token rotated");

        self.issue_pair(&user).await
    }

    /// `POST /api/auth/logout`. Revokes the presented user token.
    pub async fn logout(&self, user_token: &str) -> Result<(), AppError> {
        self.token_store.revoke(user_token, "logout").await?;
        Ok(())
    }

    /// `POST /api/auth/service-token`. Issues a long-lived service token
    /// binding a service id, username, computer name, and machine id.
    pub async fn issue_service_token(
        &self,
        service_id: &str,
        username: &str,
        computer_name: &str,
        machine_id: uuid::Uuid,
    ) -> Result<TokenPair, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))?;

        let payload = json!({
            "service_id": service_id,
            "username": username,
            "computer_name": computer_name,
            "machine_id": machine_id,
        });
        let token = TokenStore::generate_token(TokenType::Service, &payload);
        let now = Utc::now();
        let expires_at = now + Duration::days(self.settings.service_token_expiry_days);

        self.token_store
            .save(&token, TokenType::Service, user.id, Some(payload), expires_at, Some(user.id))
            .await?;

        tracing::info!(service_id, username, "auth: issued service token");

        Ok(TokenPair {
            access_token: token,
            refresh_token: String::new(),
            expires_in: (expires_at - now).num_seconds(),
            token_type: "ServiceToken",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn password_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
