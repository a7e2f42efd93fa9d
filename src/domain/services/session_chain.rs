//! Continuity-chain statistics.
//!
//! A chain is a sequence of `Session` rows linked by
//! `continued_from_session`/`continued_by_session`, ordered oldest first.
//! Walking the links to assemble the chain is an infrastructure concern
//! (it requires repository lookups); this module only reduces an already
//! ordered chain into summary statistics, so it stays I/O-free and
//! trivially unit-testable.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::entities::Session;

/// Aggregate statistics over one continuity chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChainStats {
    pub total_sessions: usize,
    pub first_login: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub total_duration_seconds: i64,
    pub total_gap_seconds: i64,
    pub real_time_span_seconds: i64,
    pub continuity_percentage: f64,
}

/// Reduce an ordered chain (oldest first) into `ChainStats`.
///
/// `now` stands in for the logout time of a still-open session at the
/// end of the chain. Returns `None` for an empty chain.
pub fn compute_chain_stats(chain: &[Session], now: DateTime<Utc>) -> Option<ChainStats> {
    let first = chain.first()?;
    let last = chain.last()?;

    let total_sessions = chain.len();
    let first_login = first.login_time;
    let last_activity = last.effective_end(now);

    let total_duration = chain
        .iter()
        .fold(Duration::zero(), |acc, s| acc + s.duration(now));

    let total_gap = chain.iter().skip(1).fold(Duration::zero(), |acc, s| {
        acc + s
            .time_since_previous_session
            .map(Duration::seconds)
            .unwrap_or_else(Duration::zero)
    });

    let real_time_span = last_activity - first_login;

    let continuity_percentage = if real_time_span > Duration::zero() {
        (total_duration.num_milliseconds() as f64 / real_time_span.num_milliseconds() as f64)
            * 100.0
    } else {
        100.0
    };

    Some(ChainStats {
        total_sessions,
        first_login,
        last_activity,
        total_duration_seconds: total_duration.num_seconds(),
        total_gap_seconds: total_gap.num_seconds(),
        real_time_span_seconds: real_time_span.num_seconds(),
        continuity_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session_at(
        login_offset_secs: i64,
        duration_secs: i64,
        gap_secs: Option<i64>,
    ) -> Session {
        let base = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let login_time = base + Duration::seconds(login_offset_secs);
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            machine_id: Uuid::new_v4(),
            ip_address: None,
            session_data: None,
            login_time,
            logout_time: Some(login_time + Duration::seconds(duration_secs)),
            continued_from_session: None,
            continued_by_session: None,
            previous_session_end_time: None,
            time_since_previous_session: gap_secs,
            created_at: login_time,
            created_by: None,
            updated_at: login_time,
            updated_by: None,
        }
    }

    #[test]
    fn empty_chain_yields_none() {
        assert!(compute_chain_stats(&[], Utc::now()).is_none());
    }

    #[test]
    fn single_session_is_fully_continuous() {
        let chain = vec![session_at(0, 3600, None)];
        let stats = compute_chain_stats(&chain, Utc::now()).unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_duration_seconds, 3600);
        assert_eq!(stats.total_gap_seconds, 0);
        assert!((stats.continuity_percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn two_session_chain_accounts_for_the_gap() {
        let chain = vec![session_at(0, 1800, None), session_at(3600, 1800, Some(1800))];
        let stats = compute_chain_stats(&chain, Utc::now()).unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_duration_seconds, 3600);
        assert_eq!(stats.total_gap_seconds, 1800);
        assert_eq!(stats.real_time_span_seconds, 5400);
        assert!((stats.continuity_percentage - (3600.0 / 5400.0 * 100.0)).abs() < 1e-9);
    }
}
