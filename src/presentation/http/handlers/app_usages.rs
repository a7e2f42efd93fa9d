//! App Usage Handlers (thin CRUD)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateAppUsageRequest, PaginationParams};
use crate::application::dto::response::{AppUsageResponse, PageResponse};
use crate::domain::{AppUsage, AppUsageRepository};
use crate::infrastructure::repositories::PgAppUsageRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<CreateAppUsageRequest>,
) -> Result<(StatusCode, Json<AppUsageResponse>), AppError> {
    if let Some(end_time) = body.end_time {
        if end_time <= body.start_time {
            return Err(AppError::Validation("end_time must be after start_time".into()));
        }
    }

    let now = chrono::Utc::now();
    let usage = AppUsage {
        id: Uuid::new_v4(),
        session_id: body.session_id,
        app_id: body.app_id,
        window_title: body.window_title,
        start_time: body.start_time,
        end_time: body.end_time,
        is_active: body.is_active,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };

    let repo = PgAppUsageRepository::new(state.db.clone());
    let created = repo.create(&usage).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<AppUsageResponse>>, AppError> {
    let repo = PgAppUsageRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(AppUsageResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn list_for_session(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<AppUsageResponse>>, AppError> {
    let repo = PgAppUsageRepository::new(state.db.clone());
    let items = repo.list_for_session(session_id).await?;
    Ok(Json(items.into_iter().map(AppUsageResponse::from).collect()))
}
