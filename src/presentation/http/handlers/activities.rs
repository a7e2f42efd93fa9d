//! Activity Event Handlers (thin CRUD)
//!
//! Activity events are an append-only stream; the repository exposes
//! `create`/`list_for_session`/`get_all_paginated` only, so there is no
//! update or delete surface here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateActivityEventRequest, PaginationParams};
use crate::application::dto::response::{ActivityEventResponse, PageResponse};
use crate::domain::{ActivityEvent, ActivityEventRepository, ActivityEventType};
use crate::infrastructure::repositories::PgActivityEventRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<CreateActivityEventRequest>,
) -> Result<(StatusCode, Json<ActivityEventResponse>), AppError> {
    let event_type = ActivityEventType::parse(&body.event_type)
        .ok_or_else(|| AppError::Validation(format!("unknown event_type '{}'", body.event_type)))?;

    let now = chrono::Utc::now();
    let event = ActivityEvent {
        id: Uuid::new_v4(),
        session_id: body.session_id,
        app_id: body.app_id,
        event_type,
        event_time: body.event_time,
        event_data: body.event_data,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };

    let repo = PgActivityEventRepository::new(state.db.clone());
    let created = repo.create(&event).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<ActivityEventResponse>>, AppError> {
    let repo = PgActivityEventRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(ActivityEventResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn list_for_session(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ActivityEventResponse>>, AppError> {
    let repo = PgActivityEventRepository::new(state.db.clone());
    let items = repo.list_for_session(session_id).await?;
    Ok(Json(items.into_iter().map(ActivityEventResponse::from).collect()))
}
