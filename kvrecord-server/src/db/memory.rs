//! In-memory store
//!
//! Same contract as the PostgreSQL store, kept in process. Used by the router
//! tests and by `kvrecord serve --memory`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{DbError, RecordStore};
use crate::models::{DayRange, EntryKey, NewRecord, Record, UpsertOutcome};

#[derive(Default)]
struct Tables {
    /// `None` until `ensure_kv_table` runs
    kv: Option<BTreeMap<String, String>>,
    records: Vec<Record>,
    next_id: i64,
    outage: Option<String>,
}

impl Tables {
    fn check(&self) -> Result<(), DbError> {
        match &self.outage {
            Some(reason) => Err(DbError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn kv(&self) -> Result<&BTreeMap<String, String>, DbError> {
        self.check()?;
        self.kv.as_ref().ok_or_else(missing_kv_table)
    }

    fn kv_mut(&mut self) -> Result<&mut BTreeMap<String, String>, DbError> {
        self.check()?;
        self.kv.as_mut().ok_or_else(missing_kv_table)
    }
}

fn missing_kv_table() -> DbError {
    DbError::Unavailable("relation \"key_value_store\" does not exist".to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `reason`, or recover with `None`.
    pub async fn set_outage(&self, reason: Option<&str>) {
        self.tables.write().await.outage = reason.map(str::to_owned);
    }

    pub async fn record_count(&self) -> usize {
        self.tables.read().await.records.len()
    }

    /// Seed a record with an explicit creation day.
    pub async fn seed_record(&self, record: &NewRecord) -> i64 {
        let mut tables = self.tables.write().await;
        push_record(&mut tables, record)
    }
}

fn push_record(tables: &mut Tables, record: &NewRecord) -> i64 {
    tables.next_id += 1;
    let id = tables.next_id;
    tables.records.push(Record {
        id,
        name: record.name.clone(),
        score: record.score,
        created_at: record.created_at.date(),
    });
    id
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn server_version(&self) -> Result<Option<String>, DbError> {
        self.tables.read().await.check()?;
        Ok(Some(env!("CARGO_PKG_VERSION").to_string()))
    }

    async fn ensure_kv_table(&self) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        tables.check()?;
        tables.kv.get_or_insert_with(BTreeMap::new);
        Ok(())
    }

    async fn upsert(&self, key: &EntryKey, value: &str) -> Result<UpsertOutcome, DbError> {
        let mut tables = self.tables.write().await;
        let previous = tables
            .kv_mut()?
            .insert(key.as_str().to_owned(), value.to_owned());
        Ok(UpsertOutcome::from_inserted(previous.is_none()))
    }

    async fn retrieve(&self, key: &str) -> Result<Option<String>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.kv()?.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        Ok(tables.kv_mut()?.remove(key).is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.kv()?.keys().cloned().collect())
    }

    async fn insert_record(&self, record: &NewRecord) -> Result<i64, DbError> {
        let mut tables = self.tables.write().await;
        tables.check()?;
        Ok(push_record(&mut tables, record))
    }

    async fn query_by_range(&self, range: DayRange) -> Result<Vec<Record>, DbError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables
            .records
            .iter()
            .filter(|r| range.contains(r.created_at.and_time(chrono::NaiveTime::MIN)))
            .cloned()
            .collect())
    }

    async fn query_by_name(&self, name: &str) -> Result<Vec<Record>, DbError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables
            .records
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect())
    }
}
