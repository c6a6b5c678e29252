//! Database configuration
//!
//! Connection settings are resolved once at startup and handed to the pool
//! builder. Either a full `DATABASE_URL` or the individual `DB_*` parts are
//! accepted; the URL wins when both are present.

use std::env;

use sqlx::postgres::PgConnectOptions;

/// Default PostgreSQL port
const DEFAULT_DB_PORT: u16 = 5432;

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing database setting: set DATABASE_URL or {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("invalid database url: {0}")]
    Url(#[from] sqlx::Error),
}

/// Where the database lives
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
}

// Hand-written so credentials never reach the logs.
impl std::fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(_) => f.write_str("Url(<redacted>)"),
            Self::Parts {
                host,
                port,
                user,
                database,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            target: DatabaseTarget::Url(url.into()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(value) => parse_pool_size(value)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        if let Some(url) = var("DATABASE_URL") {
            return Ok(Self {
                target: DatabaseTarget::Url(url),
                max_connections,
            });
        }

        let port = match var("DB_PORT") {
            Some(value) => parse_var("DB_PORT", value)?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            target: DatabaseTarget::Parts {
                host: var("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?,
                port,
                user: var("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: var("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
            },
            max_connections,
        })
    }

    /// Builder-style override of the pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    /// Connection options for sqlx.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        match &self.target {
            DatabaseTarget::Url(url) => Ok(url.parse::<PgConnectOptions>()?),
            DatabaseTarget::Parts {
                host,
                port,
                user,
                password,
                database,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .password(password)
                .database(database)),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

/// A pool needs at least one connection.
fn parse_pool_size(value: String) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            name: "DB_MAX_CONNECTIONS",
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn url_wins_over_parts() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://u:p@db/app"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.target, DatabaseTarget::Url("postgres://u:p@db/app".into()));
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn parts_with_defaults() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            ("DB_HOST", "db.local"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "records"),
            ("DB_MAX_CONNECTIONS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 4);
        match config.target {
            DatabaseTarget::Parts { host, port, .. } => {
                assert_eq!(host, "db.local");
                assert_eq!(port, 5432);
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn missing_parts_reported() {
        let err = DatabaseConfig::from_lookup(lookup(&[("DB_HOST", "db")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_USER")));
    }

    #[test]
    fn invalid_port_reported() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            ("DB_HOST", "db"),
            ("DB_USER", "u"),
            ("DB_NAME", "n"),
            ("DB_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DB_PORT", .. }));
    }

    #[test]
    fn zero_pool_size_rejected() {
        for value in ["0", " 0 ", "-1", "many"] {
            let err = DatabaseConfig::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://u:p@db/app"),
                ("DB_MAX_CONNECTIONS", value),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. }),
                "accepted {value:?}"
            );
        }
    }

    #[test]
    fn pool_size_override_never_zero() {
        let config = DatabaseConfig::from_url("postgres://db/app").with_max_connections(0);
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = DatabaseConfig::from_url("postgres://u:hunter2@db/app");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
