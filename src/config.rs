use std::env;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SQLITE_FILE: &str = "./dev.sqlite";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub storage: StorageConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            storage: StorageConfig::from_env(),
        }
    }
}

/// Inputs for the storage-backend selection.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Postgres connection string. Its presence selects the Postgres backend.
    pub database_url: Option<String>,
    /// SQLite file used when no connection string is configured.
    pub sqlite_file: String,
    pub max_connections: u32,
}

/// Which storage backend a configuration resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    Sqlite,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            sqlite_file: env::var("SQLITE_FILE").unwrap_or_else(|_| DEFAULT_SQLITE_FILE.to_string()),
            max_connections: 10,
        }
    }

    /// Canonical selection rule: Postgres when a connection string is set,
    /// the SQLite fallback otherwise.
    pub fn backend_kind(&self) -> BackendKind {
        if self.database_url.is_some() {
            BackendKind::Postgres
        } else {
            BackendKind::Sqlite
        }
    }

    /// Single-connection in-memory SQLite, for tests and quick local runs.
    pub fn in_memory() -> Self {
        Self {
            database_url: None,
            sqlite_file: ":memory:".to_string(),
            max_connections: 1,
        }
    }
}
