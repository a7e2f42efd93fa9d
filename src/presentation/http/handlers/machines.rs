//! Machine Handshake Handler
//!
//! `POST /api/machines/handshake` resolves a machine by
//! `(hostname, unique_id)` or creates it, refreshing `last_seen`/`active`
//! on every call so a workstation's row always reflects its latest check-in.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use crate::application::dto::request::MachineHandshakeRequest;
use crate::application::dto::response::MachineResponse;
use crate::domain::{Machine, MachineRepository};
use crate::infrastructure::repositories::PgMachineRepository;
use crate::presentation::http::extractors::RequireUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn handshake(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    Json(body): Json<MachineHandshakeRequest>,
) -> Result<(StatusCode, Json<MachineResponse>), AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = PgMachineRepository::new(state.db.clone());

    let (machine, created) = match repo
        .find_by_hostname_and_unique_id(&body.hostname, &body.unique_id)
        .await?
    {
        Some(mut existing) => {
            existing.mac = body.mac.or(existing.mac);
            existing.os = body.os.or(existing.os);
            existing.cpu = body.cpu.or(existing.cpu);
            existing.gpu = body.gpu.or(existing.gpu);
            existing.ram = body.ram.or(existing.ram);
            existing.last_seen = Utc::now();
            existing.active = true;
            existing.updated_by = Some(identity.user_id);
            (repo.update(&existing).await?, false)
        }
        None => {
            let mut machine = Machine::new(body.hostname, body.unique_id);
            machine.mac = body.mac;
            machine.os = body.os;
            machine.cpu = body.cpu;
            machine.gpu = body.gpu;
            machine.ram = body.ram;
            machine.created_by = Some(identity.user_id);
            machine.updated_by = Some(identity.user_id);
            (repo.create(&machine).await?, true)
        }
    };

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(machine.into())))
}
