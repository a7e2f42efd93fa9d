//! Session Event Handlers (thin CRUD)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateSessionEventRequest, PaginationParams};
use crate::application::dto::response::{PageResponse, SessionEventResponse};
use crate::domain::{SessionEvent, SessionEventRepository, SessionEventType};
use crate::infrastructure::repositories::PgSessionEventRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<CreateSessionEventRequest>,
) -> Result<(StatusCode, Json<SessionEventResponse>), AppError> {
    let event_type = SessionEventType::parse(&body.event_type)
        .ok_or_else(|| AppError::Validation(format!("unknown event_type '{}'", body.event_type)))?;

    let now = chrono::Utc::now();
    let event = SessionEvent {
        id: Uuid::new_v4(),
        session_id: body.session_id,
        event_type,
        event_time: body.event_time,
        user_id: body.user_id,
        previous_user_id: body.previous_user_id,
        machine_id: body.machine_id,
        terminal_session_id: body.terminal_session_id,
        is_remote: body.is_remote,
        event_data: body.event_data,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };

    let repo = PgSessionEventRepository::new(state.db.clone());
    let created = repo.create(&event).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<SessionEventResponse>>, AppError> {
    let repo = PgSessionEventRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(SessionEventResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn list_for_session(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<SessionEventResponse>>, AppError> {
    let repo = PgSessionEventRepository::new(state.db.clone());
    let items = repo.list_for_session(session_id).await?;
    Ok(Json(items.into_iter().map(SessionEventResponse::from).collect()))
}
