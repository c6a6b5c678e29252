//! Command implementations for the kvrecord CLI

pub mod ping;
pub mod serve;

pub use ping::run_ping;
pub use serve::run_serve;

use anyhow::{Context, Result};
use kvrecord_server::DatabaseConfig;

/// Resolve database settings: `--database-url` first, then the environment.
pub(crate) fn database_config(
    database_url: Option<String>,
    max_connections: Option<u32>,
) -> Result<DatabaseConfig> {
    let config = match database_url {
        Some(url) => DatabaseConfig::from_url(url),
        None => DatabaseConfig::from_env()
            .context("Database not configured. Set --database-url, DATABASE_URL, or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME")?,
    };

    Ok(match max_connections {
        Some(n) => config.with_max_connections(n),
        None => config,
    })
}
