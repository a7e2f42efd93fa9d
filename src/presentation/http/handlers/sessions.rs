//! Session Handlers
//!
//! Resolve-or-create, end, and chain inspection. `POST /api/sessions` and
//! `POST /api/sessions/{id}/end` accept user or service credentials;
//! chain inspection requires a user credential.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::request::{EndSessionRequest, ResolveSessionRequest};
use crate::application::dto::response::{ChainResponse, ChainStatsResponse, SessionResponse};
use crate::application::services::ResolveInput;
use crate::domain::SessionRepository;
use crate::infrastructure::repositories::PgSessionRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// `POST /api/sessions`
pub async fn resolve(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<ResolveSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session_id = state
        .session_engine
        .resolve_or_create(ResolveInput {
            user_id: identity.user_id,
            machine_id: body.machine_id,
            now: Utc::now(),
            ip_address: body.ip_address,
            session_data: body.session_data,
        })
        .await?;

    let repo = PgSessionRepository::new(state.db.clone());
    let session = repo
        .find_by_id(session_id)
        .await?
        .ok_or_else(|| AppError::Internal("resolved session vanished".into()))?;

    Ok((StatusCode::OK, Json(session.into())))
}

/// `POST /api/sessions/{id}/end`
pub async fn end(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(id): Path<Uuid>,
    Json(body): Json<EndSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let at = body.logout_time.unwrap_or_else(Utc::now);
    let session = state
        .session_engine
        .end_session(id, at, Some(identity.user_id))
        .await?;
    Ok(Json(session.into()))
}

/// `GET /api/sessions/{id}/chain`
pub async fn chain(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChainResponse>, AppError> {
    let sessions = state.session_engine.get_chain(id).await?;
    Ok(Json(ChainResponse {
        sessions: sessions.into_iter().map(SessionResponse::from).collect(),
    }))
}

/// `GET /api/sessions/{id}/chain/stats`
pub async fn chain_stats(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChainStatsResponse>, AppError> {
    let stats = state.session_engine.get_chain_stats(id, Utc::now()).await?;
    Ok(Json(stats.into()))
}
