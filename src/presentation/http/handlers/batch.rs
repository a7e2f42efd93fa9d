//! Batch Ingest Handlers
//!
//! `POST /api/batch` (session id in body) and `POST /api/sessions/{id}/batch`
//! (session id in path) both fan out to the same pipeline.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::BatchIngestRequest;
use crate::application::services::BatchRequest;
use crate::domain::SessionRepository;
use crate::infrastructure::repositories::PgSessionRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn into_batch_request(body: BatchIngestRequest) -> BatchRequest {
    BatchRequest {
        session_id: body.session_id,
        activity_events: body.activity_events,
        app_usages: body.app_usages,
        system_metrics: body.system_metrics,
        session_events: body.session_events,
    }
}

async fn run_batch(
    state: &AppState,
    identity_user_id: Uuid,
    path_session_id: Option<Uuid>,
    body: BatchIngestRequest,
) -> Result<crate::application::services::BatchResponse, AppError> {
    let effective_session_id = path_session_id
        .or(body.session_id)
        .ok_or_else(|| AppError::BadRequest("session_id is required".into()))?;

    let repo = PgSessionRepository::new(state.db.clone());
    let session = repo
        .find_by_id(effective_session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("session {effective_session_id} not found")))?;

    state
        .batch_pipeline
        .run(path_session_id, session.machine_id, identity_user_id, into_batch_request(body))
        .await
}

/// `POST /api/batch`
pub async fn ingest(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<BatchIngestRequest>,
) -> Result<Json<crate::application::services::BatchResponse>, AppError> {
    let response = run_batch(&state, identity.user_id, None, body).await?;
    Ok(Json(response))
}

/// `POST /api/sessions/{id}/batch`
pub async fn ingest_for_session(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Path(session_id): Path<Uuid>,
    Json(body): Json<BatchIngestRequest>,
) -> Result<Json<crate::application::services::BatchResponse>, AppError> {
    let response = run_batch(&state, identity.user_id, Some(session_id), body).await?;
    Ok(Json(response))
}
