//! Database abstraction layer for the fleet server
//!
//! Storage lives behind the traits in [`crate::backend`]; this module
//! holds the database-facing configuration and the SQLite implementation.

pub mod config;
pub mod sqlite;

pub use config::DatabaseBackendConfig;
