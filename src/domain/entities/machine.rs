//! Machine entity and repository trait.
//!
//! Maps to the `machines` table. Resolved or created during agent
//! handshake by `(hostname, unique_id)` match.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::AppError;

/// Workstation identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: Uuid,

    pub hostname: String,
    pub unique_id: String,
    pub mac: Option<String>,
    pub os: Option<String>,
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub ram: Option<String>,

    pub last_seen: DateTime<Utc>,
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl Machine {
    pub fn new(hostname: String, unique_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hostname,
            unique_id,
            mac: None,
            os: None,
            cpu: None,
            gpu: None,
            ram: None,
            last_seen: now,
            active: true,
            created_at: now,
            created_by: None,
            updated_at: now,
            updated_by: None,
        }
    }
}

/// Repository trait for Machine data access operations.
#[async_trait]
pub trait MachineRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Machine>, AppError>;
    async fn find_by_hostname_and_unique_id(
        &self,
        hostname: &str,
        unique_id: &str,
    ) -> Result<Option<Machine>, AppError>;
    async fn create(&self, machine: &Machine) -> Result<Machine, AppError>;
    async fn update(&self, machine: &Machine) -> Result<Machine, AppError>;
    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Machine>, i64), AppError>;
}
