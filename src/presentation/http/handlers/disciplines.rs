//! Discipline Handlers (thin CRUD, admin-managed)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::request::{CreateDisciplineRequest, PaginationParams};
use crate::application::dto::response::{DisciplineResponse, PageResponse};
use crate::domain::{Discipline, DisciplineRepository};
use crate::infrastructure::repositories::PgDisciplineRepository;
use crate::presentation::http::extractors::{RequireAdmin, RequireUser};
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(identity): RequireAdmin,
    Json(body): Json<CreateDisciplineRequest>,
) -> Result<(StatusCode, Json<DisciplineResponse>), AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = PgDisciplineRepository::new(state.db.clone());
    if repo.find_by_name(&body.name).await?.is_some() {
        return Err(AppError::Conflict(format!("discipline '{}' already exists", body.name)));
    }

    let now = Utc::now();
    let discipline = Discipline {
        id: Uuid::new_v4(),
        name: body.name,
        description: body.description,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };
    let created = repo.create(&discipline).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DisciplineResponse>, AppError> {
    let repo = PgDisciplineRepository::new(state.db.clone());
    let discipline = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("discipline {id} not found")))?;
    Ok(Json(discipline.into()))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<DisciplineResponse>>, AppError> {
    let repo = PgDisciplineRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(DisciplineResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(identity): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateDisciplineRequest>,
) -> Result<Json<DisciplineResponse>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = PgDisciplineRepository::new(state.db.clone());
    let mut discipline = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("discipline {id} not found")))?;

    discipline.name = body.name;
    discipline.description = body.description;
    discipline.updated_at = Utc::now();
    discipline.updated_by = Some(identity.user_id);

    let updated = repo.update(&discipline).await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_identity): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let repo = PgDisciplineRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
