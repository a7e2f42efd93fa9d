//! Role Handlers (thin CRUD, admin-managed)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::request::{CreateRoleRequest, PaginationParams};
use crate::application::dto::response::{PageResponse, RoleResponse};
use crate::domain::{Role, RoleRepository};
use crate::infrastructure::repositories::PgRoleRepository;
use crate::presentation::http::extractors::{RequireAdmin, RequireUser};
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(identity): RequireAdmin,
    Json(body): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = PgRoleRepository::new(state.db.clone());
    if repo.find_by_name(&body.name).await?.is_some() {
        return Err(AppError::Conflict(format!("role '{}' already exists", body.name)));
    }

    let now = Utc::now();
    let role = Role {
        id: Uuid::new_v4(),
        name: body.name,
        description: body.description,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };
    let created = repo.create(&role).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleResponse>, AppError> {
    let repo = PgRoleRepository::new(state.db.clone());
    let role = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("role {id} not found")))?;
    Ok(Json(role.into()))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<RoleResponse>>, AppError> {
    let repo = PgRoleRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(RoleResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(identity): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateRoleRequest>,
) -> Result<Json<RoleResponse>, AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = PgRoleRepository::new(state.db.clone());
    let mut role = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("role {id} not found")))?;

    role.name = body.name;
    role.description = body.description;
    role.updated_at = Utc::now();
    role.updated_by = Some(identity.user_id);

    let updated = repo.update(&role).await?;
    Ok(Json(updated.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_identity): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let repo = PgRoleRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
