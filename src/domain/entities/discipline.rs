//! Discipline entity and repository trait.
//!
//! Maps to the `disciplines` table — an organizational scope (e.g. a team
//! or department) a role grant applies within.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discipline {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

#[async_trait]
pub trait DisciplineRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Discipline>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Discipline>, AppError>;
    async fn create(&self, discipline: &Discipline) -> Result<Discipline, AppError>;
    async fn update(&self, discipline: &Discipline) -> Result<Discipline, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Discipline>, i64), AppError>;
}
