//! # Domain Layer
//!
//! The domain layer contains the core business logic of the activity
//! tracking backend. It is independent of any external frameworks or
//! infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Machine, Session, etc.) and
//!   the repository traits that define their data access contracts.
//! - **services**: Pure domain services operating on entities without I/O.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure business logic and domain rules
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;

pub use entities::*;
