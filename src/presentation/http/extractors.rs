//! Custom Extractors
//!
//! Per-route authentication. Each extractor calls `AuthFramework::authorize`
//! with the `AuthLevel` its name implies, so a handler's signature alone
//! documents what it requires — no separate middleware layer to keep in
//! sync with the route table.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::application::services::{AuthLevel, Identity};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Requires a valid credential of any kind; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct RequireUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = state
            .auth_framework
            .authorize(&parts.headers, AuthLevel::User)
            .await?
            .expect("AuthLevel::User always yields an identity on success");
        Ok(RequireUser(identity))
    }
}

/// Requires the `admin` or `superadmin` role; rejects with 401/403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = state
            .auth_framework
            .authorize(&parts.headers, AuthLevel::Admin)
            .await?
            .expect("AuthLevel::Admin always yields an identity on success");
        Ok(RequireAdmin(identity))
    }
}

/// Requires the `superadmin` role; rejects with 401/403.
#[derive(Debug, Clone)]
pub struct RequireSuperadmin(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for RequireSuperadmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = state
            .auth_framework
            .authorize(&parts.headers, AuthLevel::Superadmin)
            .await?
            .expect("AuthLevel::Superadmin always yields an identity on success");
        Ok(RequireSuperadmin(identity))
    }
}

/// Extracts an identity when present but never rejects; the handler treats
/// `None` as anonymous.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = state
            .auth_framework
            .authorize(&parts.headers, AuthLevel::None)
            .await?;
        Ok(OptionalIdentity(identity))
    }
}
