//! System Metrics Handlers (thin CRUD)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::application::dto::request::{CreateSystemMetricsRequest, PaginationParams};
use crate::application::dto::response::{PageResponse, SystemMetricsResponse};
use crate::domain::{SystemMetricsRepository, SystemMetricsSample};
use crate::infrastructure::repositories::PgSystemMetricsRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<CreateSystemMetricsRequest>,
) -> Result<(StatusCode, Json<SystemMetricsResponse>), AppError> {
    let now = chrono::Utc::now();
    let sample = SystemMetricsSample {
        id: Uuid::new_v4(),
        session_id: body.session_id,
        cpu_usage: body.cpu_usage.clamp(0.0, 100.0),
        gpu_usage: body.gpu_usage.clamp(0.0, 100.0),
        memory_usage: body.memory_usage.clamp(0.0, 100.0),
        measurement_time: body.measurement_time,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };

    let repo = PgSystemMetricsRepository::new(state.db.clone());
    let created = repo.create(&sample).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<SystemMetricsResponse>>, AppError> {
    let repo = PgSystemMetricsRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(SystemMetricsResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn list_for_session(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<SystemMetricsResponse>>, AppError> {
    let repo = PgSystemMetricsRepository::new(state.db.clone());
    let items = repo.list_for_session(session_id).await?;
    Ok(Json(items.into_iter().map(SystemMetricsResponse::from).collect()))
}
