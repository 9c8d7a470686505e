use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};

use crate::config::{BackendKind, StorageConfig};

/// Storage handle selected once at startup and passed down to every caller.
/// Postgres when a connection string is configured, a local SQLite file
/// otherwise.
#[derive(Clone)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    pub async fn connect(config: &StorageConfig) -> Result<Self, sqlx::Error> {
        match config.backend_kind() {
            BackendKind::Postgres => {
                let url = config.database_url.as_deref().unwrap_or_default();
                // The hosted Postgres terminates TLS with certificates the
                // client cannot verify; require encryption without
                // certificate verification.
                let options = PgConnectOptions::from_str(url)?.ssl_mode(PgSslMode::Require);
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_with(options)
                    .await?;
                tracing::info!("connected to postgres backend");
                Ok(Self::Postgres(pool))
            }
            BackendKind::Sqlite => {
                let options = SqliteConnectOptions::new()
                    .filename(&config.sqlite_file)
                    .create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_with(options)
                    .await?;
                bootstrap_sqlite(&pool).await?;
                tracing::info!(file = %config.sqlite_file, "opened sqlite backend");
                Ok(Self::Sqlite(pool))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

/// The SQLite fallback is a zero-config development path, so the tables are
/// created on open. The Postgres schema is managed externally.
async fn bootstrap_sqlite(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS patients (
            uid TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            wallet_address TEXT NOT NULL,
            profile_picture TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS emergency_details (
            patient_uid TEXT PRIMARY KEY,
            blood_type TEXT,
            allergies TEXT,
            chronic_conditions TEXT,
            current_medications TEXT,
            emergency_contact TEXT,
            emergency_phone TEXT,
            FOREIGN KEY (patient_uid) REFERENCES patients(uid)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS emergency_access_log (
            id TEXT PRIMARY KEY,
            qr_data TEXT NOT NULL,
            patient_uid TEXT,
            outcome TEXT NOT NULL,
            accessed_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlite_fallback_opens_and_bootstraps() {
        let db = Database::connect(&StorageConfig::in_memory())
            .await
            .expect("in-memory sqlite should open");
        assert_eq!(db.backend_name(), "sqlite");

        // Bootstrapped tables are queryable right away.
        let Database::Sqlite(pool) = &db else {
            panic!("expected sqlite handle");
        };
        let patients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(patients, 0);
    }
}
