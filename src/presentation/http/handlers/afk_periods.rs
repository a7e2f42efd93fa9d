//! AFK Period Handler
//!
//! `GET /api/sessions/{id}/afk-periods` — read-only; periods are written
//! as a side effect of the Activity Event Writer, never directly.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::application::dto::response::AfkPeriodResponse;
use crate::domain::AfkPeriodRepository;
use crate::infrastructure::repositories::PgAfkPeriodRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn list_for_session(
    State(state): State<AppState>,
    RequireUser(_identity): RequireUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<AfkPeriodResponse>>, AppError> {
    let repo = PgAfkPeriodRepository::new(state.db.clone());
    let items = repo.list_for_session(session_id).await?;
    Ok(Json(items.into_iter().map(AfkPeriodResponse::from).collect()))
}
