//! Database layer - connection pool and stores
//!
//! # Design Principles
//!
//! - One bounded connection pool, built at startup and injected
//! - Handlers depend on the `RecordStore` trait, not on sqlx
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, PoolError};
pub use postgres::PgStore;
pub use store::{DbError, RecordStore};
