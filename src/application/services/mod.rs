//! Application Services
//!
//! Business logic that coordinates domain entities and repositories.
//!
//! - **AuthService**: registration, login, token refresh/issuance via the Token Store
//! - **AuthFramework**: credential extraction, identity resolution, level-based authorization
//! - **SessionEngine**: the session resolve/reopen/continue state machine
//! - **EventWriters**: one writer per ingestion stream
//! - **BatchPipeline**: fans a batch request out to the event writers

pub mod auth_framework;
pub mod auth_service;
pub mod batch_pipeline;
pub mod event_writers;
pub mod session_engine;

pub use auth_framework::{AuthFramework, AuthLevel, Identity};
pub use auth_service::{AuthService, TokenPair};
pub use batch_pipeline::{BatchPipeline, BatchRequest, BatchResponse};
pub use session_engine::{ResolveInput, SessionEngine};
