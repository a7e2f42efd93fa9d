//! Integration Tests Entry Point
//!
//! Tests are organized by module:
//! - `api/` - REST API endpoint tests
//! - `common/` - Shared test utilities
//!
//! Requires a reachable Postgres database (`DATABASE_URL` or
//! `TEST_DATABASE_URL`); see `common::TestApp`.

mod api;
mod common;
