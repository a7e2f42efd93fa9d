//! # Domain Services
//!
//! Domain services encapsulate business logic that doesn't naturally
//! belong to a single entity and needs no I/O of its own.
//!
//! ## Services
//!
//! - **session_chain**: continuity-chain statistics over a user/machine's
//!   session history.

mod session_chain;

pub use session_chain::*;
