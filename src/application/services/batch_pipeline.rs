//! Batch Pipeline
//!
//! Fans a batch of agent-collected events out to the per-stream Event
//! Writers inside one transaction, in the fixed order activity events,
//! app usages, system metrics, session events. Per-item failures are
//! accumulated and reported back without aborting the batch; only a
//! total storage failure aborts and rolls back.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::infrastructure::database::unit_of_work::with_transaction;
use crate::infrastructure::metrics::record_batch_stream;
use crate::shared::error::AppError;

use super::event_writers::{ActivityEventWriter, AppUsageWriter, SessionEventWriter, SystemMetricsWriter, WriteError};

#[derive(Debug, Default, Deserialize)]
pub struct BatchRequest {
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub activity_events: Vec<Value>,
    #[serde(default)]
    pub app_usages: Vec<Value>,
    #[serde(default)]
    pub system_metrics: Vec<Value>,
    #[serde(default)]
    pub session_events: Vec<Value>,
}

impl BatchRequest {
    fn is_empty(&self) -> bool {
        self.activity_events.is_empty()
            && self.app_usages.is_empty()
            && self.system_metrics.is_empty()
            && self.session_events.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
struct StreamCounts {
    success: u64,
    failure: u64,
    total: u64,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub session_id: Uuid,
    pub processing_time: String,
    pub success: bool,
    pub processed_counts: serde_json::Map<String, Value>,
    #[serde(flatten)]
    pub failures: serde_json::Map<String, Value>,
}

struct StreamOutcome {
    name: &'static str,
    counts: StreamCounts,
    failures: Vec<ItemFailure>,
}

impl StreamOutcome {
    fn new(name: &'static str) -> Self {
        Self { name, counts: StreamCounts::default(), failures: Vec::new() }
    }

    fn record(&mut self, index: usize, result: Result<Uuid, WriteError>) {
        self.counts.total += 1;
        match result {
            Ok(_) => {
                self.counts.success += 1;
            }
            Err(WriteError::Validation(reason)) => {
                self.counts.failure += 1;
                self.failures.push(ItemFailure { index, error: reason });
            }
            Err(WriteError::Storage(e)) => {
                self.counts.failure += 1;
                self.failures.push(ItemFailure { index, error: "storage failure".into() });
                tracing::error!(stream = self.name, index, error = %e, "batch: item storage failure");
            }
        }
    }
}

pub struct BatchPipeline {
    pool: PgPool,
}

impl BatchPipeline {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a batch. `path_session_id` is the session id from a
    /// path-scoped route (`/api/sessions/{id}/batch`), which overrides
    /// any `session_id` present in the body.
    pub async fn run(
        &self,
        path_session_id: Option<Uuid>,
        machine_id: Uuid,
        identity_user_id: Uuid,
        request: BatchRequest,
    ) -> Result<BatchResponse, AppError> {
        if request.is_empty() {
            return Err(AppError::BadRequest(
                "at least one of activity_events, app_usages, system_metrics, session_events must be non-empty".into(),
            ));
        }

        let session_id = path_session_id
            .or(request.session_id)
            .ok_or_else(|| AppError::BadRequest("session_id is required".into()))?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_sqlx)?;
        if !exists {
            return Err(AppError::NotFound(format!("session {session_id} not found")));
        }

        let now = Utc::now();

        let outcomes = with_transaction(&self.pool, |mut ctx| async move {
            let mut activity = StreamOutcome::new("activity_events");
            for (index, item) in request.activity_events.iter().enumerate() {
                let result = ActivityEventWriter::write_one(ctx.as_mut(), session_id, item, identity_user_id, now).await;
                activity.record(index, result);
            }

            let mut app_usage = StreamOutcome::new("app_usages");
            for (index, item) in request.app_usages.iter().enumerate() {
                let result = AppUsageWriter::write_one(ctx.as_mut(), session_id, item, identity_user_id, now).await;
                app_usage.record(index, result);
            }

            let mut metrics = StreamOutcome::new("system_metrics");
            for (index, item) in request.system_metrics.iter().enumerate() {
                let result = SystemMetricsWriter::write_one(ctx.as_mut(), session_id, item, identity_user_id, now).await;
                metrics.record(index, result);
            }

            let mut session_events = StreamOutcome::new("session_events");
            for (index, item) in request.session_events.iter().enumerate() {
                let result =
                    SessionEventWriter::write_one(ctx.as_mut(), session_id, item, identity_user_id, machine_id, now).await;
                session_events.record(index, result);
            }

            Ok(((activity, app_usage, metrics, session_events), ctx))
        })
        .await?;

        let (activity, app_usage, metrics, session_events) = outcomes;
        let streams = [activity, app_usage, metrics, session_events];

        let mut processed_counts = serde_json::Map::new();
        let mut failures = serde_json::Map::new();
        let mut success = true;

        for stream in streams {
            record_batch_stream(stream.name, stream.counts.success, stream.counts.failure);
            if stream.counts.failure > 0 {
                success = false;
                failures.insert(
                    format!("{}_failures", stream.name),
                    serde_json::to_value(&stream.failures).unwrap_or(Value::Null),
                );
            }
            processed_counts.insert(format!("{}_success", stream.name), stream.counts.success.into());
            processed_counts.insert(format!("{}_failure", stream.name), stream.counts.failure.into());
            processed_counts.insert(format!("{}_total", stream.name), stream.counts.total.into());
        }

        Ok(BatchResponse {
            session_id,
            processing_time: Utc::now().to_rfc3339(),
            success,
            processed_counts,
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_request_is_detected() {
        let req = BatchRequest::default();
        assert!(req.is_empty());
    }

    #[test]
    fn non_empty_batch_request_is_not_empty() {
        let mut req = BatchRequest::default();
        req.activity_events.push(serde_json::json!({}));
        assert!(!req.is_empty());
    }
}
