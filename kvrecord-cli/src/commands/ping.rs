//! Connectivity check: connect once and print the server version.

use anyhow::{Context, Result};
use clap::Parser;

use kvrecord_server::db::{create_pool, PgStore, RecordStore};

/// Arguments for the ping command
#[derive(Parser, Debug)]
pub struct PingArgs {
    /// Database URL (overrides DB_* environment settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

pub async fn run_ping(args: PingArgs) -> Result<()> {
    let db = super::database_config(args.database_url, Some(1))?;
    let pool = create_pool(&db)
        .await
        .context("Failed to connect to database")?;
    let store = PgStore::new(pool);

    let version = store
        .server_version()
        .await
        .context("Connected but version query failed")?
        .unwrap_or_else(|| "unknown".to_string());

    println!("{}_version: {}", store.backend(), version);
    store.pool().close().await;
    Ok(())
}
