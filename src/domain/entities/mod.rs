//! # Domain Entities
//!
//! Core domain entities for the activity tracking system. All entities map
//! directly to their corresponding database tables and carry the audit
//! tuple `(created_at, created_by, updated_at, updated_by)`.
//!
//! ## Identity & access
//!
//! - **User**: an authenticated principal, registered or lazily created.
//! - **Machine**: a tracked agent host, resolved by `(hostname, unique_id)`.
//! - **Token**: durable record backing the in-memory Token Store.
//! - **Role** / **Discipline** / **UserRoleDiscipline**: the authorization
//!   taxonomy — a role granted to a user within a discipline.
//!
//! ## Activity
//!
//! - **Session**: a contiguous presence of a user on a machine, possibly a
//!   link in a continuity chain.
//! - **SessionEvent**: an OS-level transition (login, lock, remote connect).
//! - **ActivityEvent**: a discrete input/focus observation.
//! - **AppUsage**: a focus interval for one application window.
//! - **SystemMetricsSample**: a point-in-time resource usage reading.
//! - **AfkPeriod**: an away-from-keyboard interval within a session.

mod activity_event;
mod afk_period;
mod app_usage;
mod discipline;
mod machine;
mod role;
mod session;
mod session_event;
mod system_metrics;
mod token;
mod user;
mod user_role_discipline;

pub use activity_event::{ActivityEvent, ActivityEventRepository, ActivityEventType};
pub use afk_period::{AfkPeriod, AfkPeriodRepository};
pub use app_usage::{AppUsage, AppUsageRepository};
pub use discipline::{Discipline, DisciplineRepository};
pub use machine::{Machine, MachineRepository};
pub use role::{Role, RoleRepository};
pub use session::{Session, SessionRepository};
pub use session_event::{SessionEvent, SessionEventRepository, SessionEventType};
pub use system_metrics::{SystemMetricsRepository, SystemMetricsSample};
pub use token::{Token, TokenRepository, TokenType};
pub use user::{User, UserRepository};
pub use user_role_discipline::{UserRoleDiscipline, UserRoleDisciplineRepository};
