//! User-Role-Discipline Grant Handlers (thin CRUD, admin-managed)
//!
//! Grants are immutable once created — the repository exposes `create`,
//! `delete`, `find_by_id`, `list_for_user`, and `get_all_paginated`, no
//! `update`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::application::dto::request::{AssignRoleDisciplineRequest, PaginationParams};
use crate::application::dto::response::{PageResponse, UserRoleDisciplineResponse};
use crate::domain::{UserRoleDiscipline, UserRoleDisciplineRepository};
use crate::infrastructure::repositories::PgUserRoleDisciplineRepository;
use crate::presentation::http::extractors::{RequireAdmin, RequireUser};
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(identity): RequireAdmin,
    Json(body): Json<AssignRoleDisciplineRequest>,
) -> Result<(StatusCode, Json<UserRoleDisciplineResponse>), AppError> {
    let now = Utc::now();
    let grant = UserRoleDiscipline {
        id: Uuid::new_v4(),
        user_id: body.user_id,
        role_id: body.role_id,
        discipline_id: body.discipline_id,
        created_at: now,
        created_by: Some(identity.user_id),
        updated_at: now,
        updated_by: Some(identity.user_id),
    };

    let repo = PgUserRoleDisciplineRepository::new(state.db.clone());
    let created = repo.create(&grant).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRoleDisciplineResponse>, AppError> {
    let repo = PgUserRoleDisciplineRepository::new(state.db.clone());
    let grant = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("grant {id} not found")))?;
    Ok(Json(grant.into()))
}

pub async fn list(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PageResponse<UserRoleDisciplineResponse>>, AppError> {
    let repo = PgUserRoleDisciplineRepository::new(state.db.clone());
    let (items, total) = repo.get_all_paginated(params.page(), params.size()).await?;
    Ok(Json(PageResponse::new(
        items.into_iter().map(UserRoleDisciplineResponse::from).collect(),
        params.page(),
        params.size(),
        total,
    )))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserRoleDisciplineResponse>>, AppError> {
    let repo = PgUserRoleDisciplineRepository::new(state.db.clone());
    let items = repo.list_for_user(user_id).await?;
    Ok(Json(items.into_iter().map(UserRoleDisciplineResponse::from).collect()))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_identity): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let repo = PgUserRoleDisciplineRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
