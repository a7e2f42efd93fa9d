//! User entity and repository trait.
//!
//! Maps to the `users` table. A user is either registered explicitly or
//! synthesized lazily by the Auth Framework on first-seen username from a
//! trusted agent (see `AuthFramework::resolve_user_for_tracking`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Identity principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Unique-ish username within the deployment.
    pub username: String,

    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub active: bool,

    pub verified: bool,

    /// Free-form status reference (e.g. account lifecycle state).
    pub status: Option<String>,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl User {
    /// Construct a user ready for insertion; audit fields default to self-authorship.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            active: true,
            verified: false,
            status: None,
            created_at: now,
            created_by: None,
            updated_at: now,
            updated_by: None,
        }
    }
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
    async fn get_all_paginated(&self, page: i64, size: i64) -> Result<(Vec<User>, i64), AppError>;
}
