//! Machine Repository Implementation
//!
//! PostgreSQL implementation of the MachineRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Machine, MachineRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct MachineRow {
    id: Uuid,
    hostname: String,
    unique_id: String,
    mac: Option<String>,
    os: Option<String>,
    cpu: Option<String>,
    gpu: Option<String>,
    ram: Option<String>,
    last_seen: DateTime<Utc>,
    active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_at: DateTime<Utc>,
    updated_by: Option<Uuid>,
}

impl MachineRow {
    fn into_machine(self) -> Machine {
        Machine {
            id: self.id,
            hostname: self.hostname,
            unique_id: self.unique_id,
            mac: self.mac,
            os: self.os,
            cpu: self.cpu,
            gpu: self.gpu,
            ram: self.ram,
            last_seen: self.last_seen,
            active: self.active,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct PgMachineRepository {
    pool: PgPool,
}

impl PgMachineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MACHINE_COLUMNS: &str = "id, hostname, unique_id, mac, os, cpu, gpu, ram, last_seen, \
     active, created_at, created_by, updated_at, updated_by";

#[async_trait]
impl MachineRepository for PgMachineRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Machine>, AppError> {
        let row = sqlx::query_as::<_, MachineRow>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(MachineRow::into_machine))
    }

    async fn find_by_hostname_and_unique_id(
        &self,
        hostname: &str,
        unique_id: &str,
    ) -> Result<Option<Machine>, AppError> {
        let row = sqlx::query_as::<_, MachineRow>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines WHERE hostname = $1 AND unique_id = $2"
        ))
        .bind(hostname)
        .bind(unique_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.map(MachineRow::into_machine))
    }

    async fn create(&self, machine: &Machine) -> Result<Machine, AppError> {
        let row = sqlx::query_as::<_, MachineRow>(&format!(
            r#"
            INSERT INTO machines (id, hostname, unique_id, mac, os, cpu, gpu, ram, last_seen,
                                   active, created_at, created_by, updated_at, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {MACHINE_COLUMNS}
            "#
        ))
        .bind(machine.id)
        .bind(&machine.hostname)
        .bind(&machine.unique_id)
        .bind(&machine.mac)
        .bind(&machine.os)
        .bind(&machine.cpu)
        .bind(&machine.gpu)
        .bind(&machine.ram)
        .bind(machine.last_seen)
        .bind(machine.active)
        .bind(machine.created_at)
        .bind(machine.created_by)
        .bind(machine.updated_at)
        .bind(machine.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        Ok(row.into_machine())
    }

    async fn update(&self, machine: &Machine) -> Result<Machine, AppError> {
        let row = sqlx::query_as::<_, MachineRow>(&format!(
            r#"
            UPDATE machines
            SET mac = $2, os = $3, cpu = $4, gpu = $5, ram = $6, active = $7,
                updated_at = NOW(), updated_by = $8
            WHERE id = $1
            RETURNING {MACHINE_COLUMNS}
            "#
        ))
        .bind(machine.id)
        .bind(&machine.mac)
        .bind(&machine.os)
        .bind(&machine.cpu)
        .bind(&machine.gpu)
        .bind(&machine.ram)
        .bind(machine.active)
        .bind(machine.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?
        .ok_or_else(|| AppError::NotFound(format!("machine {} not found", machine.id)))?;

        Ok(row.into_machine())
    }

    async fn get_all_paginated(
        &self,
        page: i64,
        size: i64,
    ) -> Result<(Vec<Machine>, i64), AppError> {
        let offset = (page.max(1) - 1) * size;
        let rows = sqlx::query_as::<_, MachineRow>(&format!(
            "SELECT {MACHINE_COLUMNS} FROM machines ORDER BY last_seen DESC LIMIT $1 OFFSET $2"
        ))
        .bind(size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM machines")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;

        Ok((rows.into_iter().map(MachineRow::into_machine).collect(), total))
    }
}
