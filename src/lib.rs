//! logbook library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, shared state
//! - `auth`: session cookie handling and the signed-in-user gate
//! - `db`: migrations and SQLite helpers
//! - `http`: Axum router and handlers
//! - `models`: typed records used across layers
//! - `store`: data access with explicit error kinds
//! - `util`: tracing setup, HTML escaping, view helpers
//! - `views`: server-rendered HTML pages

pub mod app;
pub mod auth;
pub mod db;
pub mod http;
pub mod models;
pub mod store;
pub mod util;
pub mod views;
