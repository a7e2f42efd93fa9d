//! Session Engine
//!
//! Decides, for a `(user, machine, moment)`, which session an arriving
//! event belongs to: reopen a dormant session, continue a closed one with
//! a linked-list pointer, or open a fresh one. See `SPEC_FULL.md`'s
//! Session Engine module for the algorithm this implements.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Session;
use crate::domain::services::{compute_chain_stats, ChainStats};
use crate::domain::SessionRepository;
use crate::infrastructure::database::unit_of_work::with_transaction;
use crate::infrastructure::metrics::record_session_resolved;
use crate::infrastructure::repositories::PgSessionRepository;
use crate::shared::error::AppError;

/// Inputs to `resolve_or_create`, per §4.3.
pub struct ResolveInput {
    pub user_id: Uuid,
    pub machine_id: Uuid,
    pub now: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub session_data: Option<Value>,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    login_time: DateTime<Utc>,
    logout_time: Option<DateTime<Utc>>,
}

fn midnight_utc(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), at.month(), at.day(), 0, 0, 0)
        .single()
        .expect("calendar date of a valid DateTime is always representable")
}

pub struct SessionEngine {
    pool: PgPool,
    repo: PgSessionRepository,
}

impl SessionEngine {
    pub fn new(pool: PgPool) -> Self {
        let repo = PgSessionRepository::new(pool.clone());
        Self { pool, repo }
    }

    /// The core algorithm: enumerate-and-close active sessions, then
    /// reopen today's session or continue from the last closed one.
    /// Runs inside one transaction, serialized per `(user, machine)` via
    /// a Postgres advisory lock (§5's ordering guarantee for invariant 3).
    pub async fn resolve_or_create(&self, input: ResolveInput) -> Result<Uuid, AppError> {
        let ResolveInput { user_id, machine_id, now, ip_address, session_data } = input;

        let session_id = with_transaction(&self.pool, |mut ctx| async move {
            let lock_key = format!("{user_id}:{machine_id}");
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
                .bind(lock_key)
                .execute(ctx.as_mut())
                .await
                .map_err(AppError::Database)?;

            let actives: Vec<SessionRow> = sqlx::query_as(
                "SELECT id, login_time, logout_time FROM sessions \
                 WHERE user_id = $1 AND machine_id = $2 AND logout_time IS NULL \
                 ORDER BY login_time DESC",
            )
            .bind(user_id)
            .bind(machine_id)
            .fetch_all(ctx.as_mut())
            .await
            .map_err(AppError::Database)?;

            let mut last_closed: Option<SessionRow> = None;
            for row in actives {
                sqlx::query(
                    "UPDATE sessions SET logout_time = $1, updated_at = $1, updated_by = $2 \
                     WHERE id = $3",
                )
                .bind(now)
                .bind(user_id)
                .bind(row.id)
                .execute(ctx.as_mut())
                .await
                .map_err(AppError::Database)?;

                last_closed = Some(SessionRow { id: row.id, login_time: row.login_time, logout_time: Some(now) });
            }

            let day_start = midnight_utc(now);
            let day_end = day_start + Duration::hours(24);

            let today: Option<SessionRow> = sqlx::query_as(
                "SELECT id, login_time, logout_time FROM sessions \
                 WHERE user_id = $1 AND machine_id = $2 \
                   AND login_time >= $3 AND login_time < $4 \
                 ORDER BY login_time DESC LIMIT 1",
            )
            .bind(user_id)
            .bind(machine_id)
            .bind(day_start)
            .bind(day_end)
            .fetch_optional(ctx.as_mut())
            .await
            .map_err(AppError::Database)?;

            let session_id = if let Some(today) = today {
                // Case A/B: reopen today's session, whether it was already
                // closed or was the one step 1 just closed.
                sqlx::query(
                    "UPDATE sessions SET logout_time = NULL, updated_at = $1, updated_by = $2 \
                     WHERE id = $3",
                )
                .bind(now)
                .bind(user_id)
                .bind(today.id)
                .execute(ctx.as_mut())
                .await
                .map_err(AppError::Database)?;

                record_session_resolved("reopened");
                today.id
            } else {
                // Case C: no session today, create one, continuing the
                // chain from the last closed session if there was one.
                // Step 1 only sees sessions still open at the start of
                // this call; a session already closed by a standalone
                // `end_session` earlier (spec.md §8 scenario 3) never
                // shows up there, so fall back to the most recently
                // closed session for this (user, machine) pair.
                let last_closed = match last_closed {
                    Some(lc) => Some(lc),
                    None => sqlx::query_as::<_, SessionRow>(
                        "SELECT id, login_time, logout_time FROM sessions \
                         WHERE user_id = $1 AND machine_id = $2 AND logout_time IS NOT NULL \
                         ORDER BY logout_time DESC LIMIT 1",
                    )
                    .bind(user_id)
                    .bind(machine_id)
                    .fetch_optional(ctx.as_mut())
                    .await
                    .map_err(AppError::Database)?,
                };

                let new_id = Uuid::new_v4();
                let (continued_from, prev_end, gap) = match &last_closed {
                    Some(lc) => (
                        Some(lc.id),
                        lc.logout_time,
                        lc.logout_time.map(|end| (now - end).num_seconds()),
                    ),
                    None => (None, None, None),
                };

                sqlx::query(
                    "INSERT INTO sessions (
                        id, user_id, machine_id, ip_address, session_data, login_time,
                        logout_time, continued_from_session, previous_session_end_time,
                        time_since_previous_session, created_at, created_by, updated_at, updated_by
                    ) VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $8, $9, $6, $2, $6, $2)",
                )
                .bind(new_id)
                .bind(user_id)
                .bind(machine_id)
                .bind(&ip_address)
                .bind(&session_data)
                .bind(now)
                .bind(continued_from)
                .bind(prev_end)
                .bind(gap)
                .execute(ctx.as_mut())
                .await
                .map_err(AppError::Database)?;

                if let Some(lc) = &last_closed {
                    sqlx::query(
                        "UPDATE sessions SET continued_by_session = $1, updated_at = $2, \
                         updated_by = $3 WHERE id = $4",
                    )
                    .bind(new_id)
                    .bind(now)
                    .bind(user_id)
                    .bind(lc.id)
                    .execute(ctx.as_mut())
                    .await
                    .map_err(AppError::Database)?;
                }

                record_session_resolved(if continued_from.is_some() { "continued" } else { "new" });
                new_id
            };

            Ok((session_id, ctx))
        })
        .await?;

        Ok(session_id)
    }

    /// Close a session. Rejects when `at <= login_time`.
    pub async fn end_session(&self, id: Uuid, at: DateTime<Utc>, by: Option<Uuid>) -> Result<Session, AppError> {
        let mut session = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;

        if at <= session.login_time {
            return Err(AppError::BadRequest(
                "logout_time must be strictly after login_time".into(),
            ));
        }

        if session.logout_time == Some(at) {
            // Idempotent: already closed at exactly this instant.
            return Ok(session);
        }

        session.logout_time = Some(at);
        session.updated_at = at;
        session.updated_by = by;

        self.repo.update(&session).await
    }

    /// Walk `continued_from_session` to the oldest session, then
    /// `continued_by_session` to the newest, returning the chain
    /// oldest-first. Bounded by the session count for the pair so a
    /// storage bug can never spin the loop forever.
    pub async fn get_chain(&self, id: Uuid) -> Result<Vec<Session>, AppError> {
        let anchor = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;

        let bound: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND machine_id = $2",
        )
        .bind(anchor.user_id)
        .bind(anchor.machine_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_sqlx)?;

        let mut backward = Vec::new();
        let mut cursor = anchor.continued_from_session;
        for _ in 0..bound {
            let Some(prev_id) = cursor else { break };
            let prev = self
                .repo
                .find_by_id(prev_id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("dangling chain link to {prev_id}")))?;
            cursor = prev.continued_from_session;
            backward.push(prev);
        }
        backward.reverse();

        let mut forward = Vec::new();
        let mut cursor = anchor.continued_by_session;
        for _ in 0..bound {
            let Some(next_id) = cursor else { break };
            let next = self
                .repo
                .find_by_id(next_id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("dangling chain link to {next_id}")))?;
            cursor = next.continued_by_session;
            forward.push(next);
        }

        let mut chain = backward;
        chain.push(anchor);
        chain.extend(forward);
        Ok(chain)
    }

    pub async fn get_chain_stats(&self, id: Uuid, now: DateTime<Utc>) -> Result<ChainStats, AppError> {
        let chain = self.get_chain(id).await?;
        compute_chain_stats(&chain, now)
            .ok_or_else(|| AppError::Internal("chain resolved to zero sessions".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_truncates_to_start_of_day() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T13:45:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let start = midnight_utc(at);
        assert_eq!(start.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }
}
