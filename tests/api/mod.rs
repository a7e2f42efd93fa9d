//! REST API endpoint tests, one module per resource area.

mod auth_tests;
mod status_tests;
mod session_tests;
mod batch_tests;
