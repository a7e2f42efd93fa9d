//! Event Writers
//!
//! One writer per ingestion stream, each with the same shape:
//! `write_one(session_id, payload, identity) -> ok | validation_error | storage_error`.
//! Writers run inside the caller's transaction (the Batch Pipeline's, or a
//! single-item endpoint's own) so a storage failure on one item can be
//! rolled back without touching sibling items already committed by the
//! caller's accounting.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::entities::{ActivityEventType, SessionEventType};
use crate::shared::error::AppError;

/// Outcome of a single item write, matching §4.4's three-way result.
pub enum WriteError {
    Validation(String),
    Storage(AppError),
}

impl From<sqlx::Error> for WriteError {
    fn from(e: sqlx::Error) -> Self {
        WriteError::Storage(AppError::from_sqlx(e))
    }
}

type Db<'a> = &'a mut PgConnection;

fn parse_uuid_field(payload: &Value, field: &str) -> Option<Uuid> {
    payload.get(field)?.as_str().and_then(|s| Uuid::parse_str(s).ok())
}

fn parse_time_field(payload: &Value, field: &str) -> Option<DateTime<Utc>> {
    payload
        .get(field)?
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Validates an item's own `session_id` field, if it carries one. Most
/// items omit the field and inherit the batch-resolved session; an item
/// that names one explicitly must name a real one (§4.4's "session_id
/// null/invalid UUID" rejection).
fn validate_item_session_id(payload: &Value) -> Result<(), WriteError> {
    match payload.get("session_id") {
        None => Ok(()),
        Some(Value::Null) => Err(WriteError::Validation("session_id must not be null".into())),
        Some(Value::String(s)) if Uuid::parse_str(s).is_ok() => Ok(()),
        Some(_) => Err(WriteError::Validation("session_id is not a valid UUID".into())),
    }
}

pub struct ActivityEventWriter;

impl ActivityEventWriter {
    /// Inserts an `activity_events` row; on `afk_start`/`afk_end` also
    /// opens or closes the matching `afk_periods` row.
    pub async fn write_one(
        tx: Db<'_>,
        session_id: Uuid,
        payload: &Value,
        identity_user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Uuid, WriteError> {
        validate_item_session_id(payload)?;

        let app_id = parse_uuid_field(payload, "app_id");

        let event_type = payload
            .get("event_type")
            .and_then(Value::as_str)
            .and_then(ActivityEventType::parse)
            .unwrap_or_else(|| {
                tracing::warn!("activity event: unknown event_type, defaulting to mouse_click");
                ActivityEventType::default_kind()
            });

        let event_time = parse_time_field(payload, "event_time").unwrap_or_else(|| {
            tracing::warn!("activity event: missing event_time, defaulting to now");
            now
        });

        let event_data = payload.get("event_data").cloned();

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO activity_events (
                id, session_id, app_id, event_type, event_time, event_data,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $7, $8)",
        )
        .bind(id)
        .bind(session_id)
        .bind(app_id)
        .bind(event_type.as_str())
        .bind(event_time)
        .bind(&event_data)
        .bind(now)
        .bind(identity_user_id)
        .execute(&mut *tx)
        .await?;

        match event_type {
            ActivityEventType::AfkStart => {
                sqlx::query(
                    "INSERT INTO afk_periods (
                        id, session_id, start_time, end_time, created_at, created_by, updated_at, updated_by
                    ) VALUES ($1, $2, $3, NULL, $4, $5, $4, $5)",
                )
                .bind(Uuid::new_v4())
                .bind(session_id)
                .bind(event_time)
                .bind(now)
                .bind(identity_user_id)
                .execute(&mut *tx)
                .await?;
            }
            ActivityEventType::AfkEnd => {
                let open: Option<(Uuid, DateTime<Utc>)> = sqlx::query_as(
                    "SELECT id, start_time FROM afk_periods \
                     WHERE session_id = $1 AND end_time IS NULL \
                     ORDER BY start_time DESC LIMIT 1",
                )
                .bind(session_id)
                .fetch_optional(&mut *tx)
                .await?;

                let Some((afk_id, start_time)) = open else {
                    return Err(WriteError::Validation(
                        "afk_end received with no open AFK period for session".into(),
                    ));
                };

                if event_time <= start_time {
                    return Err(WriteError::Validation(
                        "afk end_time must be after the AFK period's start_time".into(),
                    ));
                }

                sqlx::query(
                    "UPDATE afk_periods SET end_time = $1, updated_at = $2, updated_by = $3 WHERE id = $4",
                )
                .bind(event_time)
                .bind(now)
                .bind(identity_user_id)
                .bind(afk_id)
                .execute(&mut *tx)
                .await?;
            }
            _ => {}
        }

        Ok(id)
    }
}

pub struct AppUsageWriter;

impl AppUsageWriter {
    pub async fn write_one(
        tx: Db<'_>,
        session_id: Uuid,
        payload: &Value,
        identity_user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Uuid, WriteError> {
        validate_item_session_id(payload)?;

        let Some(app_id) = parse_uuid_field(payload, "app_id") else {
            return Err(WriteError::Validation("app_id is required".into()));
        };

        let start_time = parse_time_field(payload, "start_time").unwrap_or_else(|| {
            tracing::warn!("app usage: missing start_time, defaulting to now");
            now
        });
        let end_time = parse_time_field(payload, "end_time");

        if let Some(end) = end_time {
            if end <= start_time {
                return Err(WriteError::Validation("end_time must be after start_time".into()));
            }
        }

        let window_title = payload.get("window_title").and_then(Value::as_str).map(str::to_string);
        let is_active = payload.get("is_active").and_then(Value::as_bool).unwrap_or(true);

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO app_usages (
                id, session_id, app_id, window_title, start_time, end_time, is_active,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $8, $9)",
        )
        .bind(id)
        .bind(session_id)
        .bind(app_id)
        .bind(&window_title)
        .bind(start_time)
        .bind(end_time)
        .bind(is_active)
        .bind(now)
        .bind(identity_user_id)
        .execute(&mut *tx)
        .await?;

        Ok(id)
    }
}

pub struct SystemMetricsWriter;

fn clamp_percentage(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

impl SystemMetricsWriter {
    pub async fn write_one(
        tx: Db<'_>,
        session_id: Uuid,
        payload: &Value,
        identity_user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Uuid, WriteError> {
        validate_item_session_id(payload)?;

        let cpu_usage = clamp_percentage(payload.get("cpu_usage").and_then(Value::as_f64).unwrap_or(0.0));
        let gpu_usage = clamp_percentage(payload.get("gpu_usage").and_then(Value::as_f64).unwrap_or(0.0));
        let memory_usage = clamp_percentage(payload.get("memory_usage").and_then(Value::as_f64).unwrap_or(0.0));

        let measurement_time = parse_time_field(payload, "measurement_time").unwrap_or_else(|| {
            tracing::warn!("system metrics: missing measurement_time, defaulting to now");
            now
        });

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO system_metrics (
                id, session_id, cpu_usage, gpu_usage, memory_usage, measurement_time,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $7, $8)",
        )
        .bind(id)
        .bind(session_id)
        .bind(cpu_usage)
        .bind(gpu_usage)
        .bind(memory_usage)
        .bind(measurement_time)
        .bind(now)
        .bind(identity_user_id)
        .execute(&mut *tx)
        .await?;

        Ok(id)
    }
}

pub struct SessionEventWriter;

impl SessionEventWriter {
    pub async fn write_one(
        tx: Db<'_>,
        session_id: Uuid,
        payload: &Value,
        identity_user_id: Uuid,
        machine_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Uuid, WriteError> {
        validate_item_session_id(payload)?;

        let event_type = payload
            .get("event_type")
            .and_then(Value::as_str)
            .and_then(SessionEventType::parse)
            .unwrap_or_else(|| {
                tracing::warn!("session event: unknown event_type, defaulting to login");
                SessionEventType::default_kind()
            });

        let event_time = parse_time_field(payload, "event_time").unwrap_or_else(|| {
            tracing::warn!("session event: missing event_time, defaulting to now");
            now
        });

        let user_id = parse_uuid_field(payload, "user_id").unwrap_or(identity_user_id);
        let previous_user_id = parse_uuid_field(payload, "previous_user_id");
        let event_machine_id = parse_uuid_field(payload, "machine_id").unwrap_or(machine_id);
        let terminal_session_id = payload
            .get("terminal_session_id")
            .and_then(Value::as_str)
            .map(str::to_string);
        let is_remote = payload.get("is_remote").and_then(Value::as_bool).unwrap_or(false);
        let event_data = payload.get("event_data").cloned();

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO session_events (
                id, session_id, event_type, event_time, user_id, previous_user_id,
                machine_id, terminal_session_id, is_remote, event_data,
                created_at, created_by, updated_at, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $11, $12)",
        )
        .bind(id)
        .bind(session_id)
        .bind(event_type.as_str())
        .bind(event_time)
        .bind(user_id)
        .bind(previous_user_id)
        .bind(event_machine_id)
        .bind(&terminal_session_id)
        .bind(is_remote)
        .bind(&event_data)
        .bind(now)
        .bind(identity_user_id)
        .execute(&mut *tx)
        .await?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_percentage_bounds_both_sides() {
        assert_eq!(clamp_percentage(-5.0), 0.0);
        assert_eq!(clamp_percentage(150.0), 100.0);
        assert_eq!(clamp_percentage(42.5), 42.5);
    }

    #[test]
    fn parse_uuid_field_rejects_garbage() {
        let payload = serde_json::json!({ "app_id": "not-a-uuid" });
        assert!(parse_uuid_field(&payload, "app_id").is_none());
    }

    #[test]
    fn parse_uuid_field_accepts_valid_uuid() {
        let id = Uuid::new_v4();
        let payload = serde_json::json!({ "app_id": id.to_string() });
        assert_eq!(parse_uuid_field(&payload, "app_id"), Some(id));
    }

    #[test]
    fn validate_item_session_id_accepts_an_item_with_no_session_id_field() {
        let payload = serde_json::json!({ "event_type": "mouse_click" });
        assert!(validate_item_session_id(&payload).is_ok());
    }

    #[test]
    fn validate_item_session_id_rejects_an_explicit_null() {
        let payload = serde_json::json!({ "session_id": null });
        assert!(matches!(validate_item_session_id(&payload), Err(WriteError::Validation(_))));
    }

    #[test]
    fn validate_item_session_id_rejects_a_malformed_uuid() {
        let payload = serde_json::json!({ "session_id": "not-a-uuid" });
        assert!(matches!(validate_item_session_id(&payload), Err(WriteError::Validation(_))));
    }

    #[test]
    fn validate_item_session_id_accepts_a_matching_explicit_uuid() {
        let payload = serde_json::json!({ "session_id": Uuid::new_v4().to_string() });
        assert!(validate_item_session_id(&payload).is_ok());
    }
}
