//! HTTP server command
//!
//! Builds the store (pooled PostgreSQL, or in-memory with `--memory`) and runs
//! the server until Ctrl+C/SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use kvrecord_server::db::{create_pool, MemoryStore, PgStore, RecordStore};
use kvrecord_server::http::{run_server, ServerConfig, DEFAULT_PORT};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Database URL (overrides DB_* environment settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Take the client IP for /ip from X-Forwarded-For
    #[arg(long, env = "TRUST_PROXY", default_value_t = true, action = ArgAction::Set)]
    pub trust_proxy: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Keep everything in memory instead of PostgreSQL (data is lost on exit)
    #[arg(long)]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bind_addr = SocketAddr::new(args.host, args.port);

    let store: Arc<dyn RecordStore> = if args.memory {
        tracing::warn!("Using in-memory store; data will not persist");
        Arc::new(MemoryStore::new())
    } else {
        let db = super::database_config(args.database_url, args.max_connections)?;
        let pool = create_pool(&db)
            .await
            .context("Failed to create database pool")?;
        Arc::new(PgStore::new(pool))
    };

    tracing::info!(backend = store.backend(), "Starting kvrecord server on {}", bind_addr);

    let config = ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive,
        trust_proxy: args.trust_proxy,
    };

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
