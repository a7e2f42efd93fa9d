//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RefreshTokenRequest, RegisterRequest, ServiceTokenRequest};
use crate::application::dto::response::{RegisterResponse, TokenResponse, UserResponse};
use crate::application::services::AuthLevel;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, tokens) = state
        .auth_service
        .register(&body.username, &body.email, &body.password)
        .await?;

    let response = RegisterResponse {
        user: UserResponse::from_user(user, true),
        tokens: tokens.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let tokens = state.auth_service.authenticate(&body.username, &body.password).await?;
    Ok(Json(tokens.into()))
}

/// `POST /api/auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let tokens = state.auth_service.refresh(&body.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// `POST /api/auth/logout`. Requires the user token being revoked, pulled
/// from the same `Authorization: Bearer` header the extractor validated.
pub async fn logout(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    headers: axum::http::HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| raw.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    state.auth_service.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/auth/service-token`. Requires an API key or an admin user
/// credential per §6's auth column.
pub async fn issue_service_token(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(body): Json<ServiceTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let authorized_by_key = headers.get("X-API-Key").is_some()
        && state
            .auth_framework
            .authorize(&headers, AuthLevel::None)
            .await?
            .is_some();

    if !authorized_by_key {
        state.auth_framework.authorize(&headers, AuthLevel::Admin).await?;
    }

    let tokens = state
        .auth_service
        .issue_service_token(&body.service_id, &body.username, &body.computer_name, body.machine_id)
        .await?;
    Ok(Json(tokens.into()))
}
