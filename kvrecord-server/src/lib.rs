//! kvrecord-server: HTTP service over a key-value table and a scored
//! record table.
//!
//! Handlers reach storage only through [`db::RecordStore`]; the PostgreSQL
//! implementation borrows connections from one bounded pool built at startup
//! from injected [`config::DatabaseConfig`].

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, DatabaseConfig};
pub use db::{create_pool, MemoryStore, PgStore, RecordStore};
pub use http::{build_router, run_server, AppState, ServerConfig};
