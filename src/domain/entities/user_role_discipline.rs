//! User-role-discipline entity and repository trait.
//!
//! Maps to the `user_role_disciplines` join table — grants `role` to
//! `user` within `discipline`. The unique triple `(user_id, role_id,
//! discipline_id)` prevents duplicate grants. `roles_for_user` feeds
//! `Identity.data.roles` at token-issue time (see
//! `crate::application::services::auth_framework`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleDiscipline {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub discipline_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait UserRoleDisciplineRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRoleDiscipline>, AppError>;
    async fn create(
        &self,
        grant: &UserRoleDiscipline,
    ) -> Result<UserRoleDiscipline, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserRoleDiscipline>, AppError>;
    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<UserRoleDiscipline>, i64), AppError>;
}
