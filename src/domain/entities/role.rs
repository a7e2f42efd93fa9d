//! Role entity and repository trait.
//!
//! Maps to the `roles` table — a named authorization level (e.g. `admin`,
//! `superadmin`) granted to a user within a discipline via
//! `UserRoleDiscipline`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;
    async fn create(&self, role: &Role) -> Result<Role, AppError>;
    async fn update(&self, role: &Role) -> Result<Role, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn get_all_paginated(&self, page: i64, size: i64) -> Result<(Vec<Role>, i64), AppError>;
}
