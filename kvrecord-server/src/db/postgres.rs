//! PostgreSQL-backed store
//!
//! - upsert: single INSERT ... ON CONFLICT (no check-then-insert)
//! - record queries cast columns so the pre-existing `extraunary` table may
//!   use any integer width and either DATE or TIMESTAMP for `created_at`

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use super::store::{DbError, RecordStore};
use crate::models::{DayRange, EntryKey, NewRecord, Record, UpsertOutcome};

/// Record row as selected
#[derive(Debug, FromRow)]
struct RecordRow {
    id: i64,
    name: String,
    score: i32,
    created_at: NaiveDate,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            score: row.score,
            created_at: row.created_at,
        }
    }
}

/// Store backed by a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn server_version(&self) -> Result<Option<String>, DbError> {
        let version: Option<String> =
            sqlx::query_scalar("SELECT current_setting('server_version')")
                .fetch_optional(&self.pool)
                .await?;
        Ok(version)
    }

    async fn ensure_kv_table(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_value_store (
                id SERIAL PRIMARY KEY,
                "key" VARCHAR(255) NOT NULL UNIQUE,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(r#"CREATE INDEX IF NOT EXISTS key_index ON key_value_store ("key")"#)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn upsert(&self, key: &EntryKey, value: &str) -> Result<UpsertOutcome, DbError> {
        // xmax is 0 only for a freshly inserted tuple
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO key_value_store ("key", value)
            VALUES ($1, $2)
            ON CONFLICT ("key") DO UPDATE
            SET value = EXCLUDED.value
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpsertOutcome::from_inserted(inserted))
    }

    async fn retrieve(&self, key: &str) -> Result<Option<String>, DbError> {
        let value: Option<String> =
            sqlx::query_scalar(r#"SELECT value FROM key_value_store WHERE "key" = $1"#)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM key_value_store WHERE "key" = $1"#)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_keys(&self) -> Result<Vec<String>, DbError> {
        let keys: Vec<String> = sqlx::query_scalar(r#"SELECT "key" FROM key_value_store"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    async fn insert_record(&self, record: &NewRecord) -> Result<i64, DbError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO extraunary (name, score, created_at)
            VALUES ($1, $2, $3)
            RETURNING id::BIGINT
            "#,
        )
        .bind(&record.name)
        .bind(record.score)
        .bind(record.created_at.start_of_day())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn query_by_range(&self, range: DayRange) -> Result<Vec<Record>, DbError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id::BIGINT AS id, name, score::INTEGER AS score, created_at::DATE AS created_at
            FROM extraunary
            WHERE created_at BETWEEN $1 AND $2
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn query_by_name(&self, name: &str) -> Result<Vec<Record>, DbError> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT id::BIGINT AS id, name, score::INTEGER AS score, created_at::DATE AS created_at
            FROM extraunary
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::create_pool;
    use crate::models::RecordDate;

    // Run with: DATABASE_URL=postgres://... cargo test -p kvrecord-server -- --ignored

    async fn store() -> PgStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&DatabaseConfig::from_url(url))
            .await
            .expect("pool creation failed");
        let store = PgStore::new(pool);
        store.ensure_kv_table().await.expect("ddl failed");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS extraunary (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                score INTEGER NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(store.pool())
        .await
        .expect("record table");
        store
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn upsert_reports_insert_then_update() {
        let store = store().await;
        let key = EntryKey::new("pg-upsert-test").unwrap();
        store.delete(key.as_str()).await.unwrap();

        assert_eq!(store.upsert(&key, "one").await.unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert(&key, "two").await.unwrap(), UpsertOutcome::Updated);
        assert_eq!(store.retrieve(key.as_str()).await.unwrap().as_deref(), Some("two"));
        assert!(store.delete(key.as_str()).await.unwrap());
        assert!(!store.delete(key.as_str()).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ensure_table_is_idempotent() {
        let store = store().await;
        store.ensure_kv_table().await.unwrap();
        store.ensure_kv_table().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn record_insert_and_range() {
        let store = store().await;
        let day = RecordDate::parse("17-08-1999").unwrap();
        let id = store
            .insert_record(&NewRecord {
                name: "pg-range-test".into(),
                score: 9,
                created_at: day,
            })
            .await
            .unwrap();

        let rows = store.query_by_range(DayRange::days(day, day)).await.unwrap();
        assert!(rows.iter().any(|r| r.id == id && r.created_at == day.date()));

        let rows = store.query_by_name("pg-range-test").await.unwrap();
        assert!(rows.iter().any(|r| r.id == id && r.score == 9));
    }
}
