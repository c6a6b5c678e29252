//! Data-access interface
//!
//! Handlers only ever talk to a `RecordStore`. Each method maps to one
//! statement against the backing store.

use async_trait::async_trait;

use crate::models::{DayRange, EntryKey, NewRecord, Record, UpsertOutcome};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Short backend name, used as the `<name>_version` response key.
    fn backend(&self) -> &'static str;

    /// Server version string, if the server reports one.
    async fn server_version(&self) -> Result<Option<String>, DbError>;

    /// Create the key-value table and its index if absent.
    async fn ensure_kv_table(&self) -> Result<(), DbError>;

    /// Insert the key, or replace its value if it exists.
    async fn upsert(&self, key: &EntryKey, value: &str) -> Result<UpsertOutcome, DbError>;

    async fn retrieve(&self, key: &str) -> Result<Option<String>, DbError>;

    /// Delete by key. Returns whether a row was removed.
    async fn delete(&self, key: &str) -> Result<bool, DbError>;

    async fn list_keys(&self) -> Result<Vec<String>, DbError>;

    /// Insert a record and return its assigned id.
    async fn insert_record(&self, record: &NewRecord) -> Result<i64, DbError>;

    async fn query_by_range(&self, range: DayRange) -> Result<Vec<Record>, DbError>;

    async fn query_by_name(&self, name: &str) -> Result<Vec<Record>, DbError>;
}
