//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits. Each repository
//! handles data access for a single entity type, following the
//! dependency-inversion pattern: the trait lives in the domain layer, the
//! `Pg*` struct implementing it lives here.

pub mod activity_event_repository;
pub mod afk_period_repository;
pub mod app_usage_repository;
pub mod discipline_repository;
pub mod machine_repository;
pub mod role_repository;
pub mod session_event_repository;
pub mod session_repository;
pub mod system_metrics_repository;
pub mod token_repository;
pub mod user_repository;
pub mod user_role_discipline_repository;

pub use activity_event_repository::PgActivityEventRepository;
pub use afk_period_repository::PgAfkPeriodRepository;
pub use app_usage_repository::PgAppUsageRepository;
pub use discipline_repository::PgDisciplineRepository;
pub use machine_repository::PgMachineRepository;
pub use role_repository::PgRoleRepository;
pub use session_event_repository::PgSessionEventRepository;
pub use session_repository::PgSessionRepository;
pub use system_metrics_repository::PgSystemMetricsRepository;
pub use token_repository::PgTokenRepository;
pub use user_repository::PgUserRepository;
pub use user_role_discipline_repository::PgUserRoleDisciplineRepository;
