use std::str::FromStr;

use radios_core::radio::NameUniqueness;

/// Which [`radios_db::store::RadioStore`] implementation to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Non-persistent, for local runs without a database.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{other}' (expected postgres or memory)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except `DATABASE_URL` have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// PostgreSQL connection string. Required when `store_backend` is postgres.
    pub database_url: Option<String>,
    /// Pool size (default: `10`).
    pub db_max_connections: u32,
    pub store_backend: StoreBackend,
    /// Duplicate-name policy applied on create and update.
    pub name_uniqueness: NameUniqueness,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default             |
    /// |-------------------------|---------------------|
    /// | `HOST`                  | `0.0.0.0`           |
    /// | `PORT`                  | `5000`              |
    /// | `CORS_ORIGINS`          | `*`                 |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                |
    /// | `DATABASE_URL`          | (none)              |
    /// | `DB_MAX_CONNECTIONS`    | `10`                |
    /// | `STORE_BACKEND`         | `postgres`          |
    /// | `RADIO_NAME_UNIQUENESS` | `case_insensitive`  |
    /// | `LOG_FORMAT`            | `pretty`            |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let store_backend = parse_var("STORE_BACKEND");
        let name_uniqueness = parse_var("RADIO_NAME_UNIQUENESS");
        let log_format = parse_var("LOG_FORMAT");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            db_max_connections,
            store_backend,
            name_uniqueness,
            log_format,
        }
    }
}

/// Parse an optional env var, falling back to `T::default()` when unset.
fn parse_var<T>(name: &str) -> T
where
    T: FromStr<Err = String> + Default,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("Invalid {name}: {e}")),
        Err(_) => T::default(),
    }
}
