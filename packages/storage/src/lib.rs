// ABOUTME: Data layer plumbing shared by the Quillpad storage crates
// ABOUTME: Provides the SQLite pool, embedded migrations, timestamps and StorageError

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    /// A UNIQUE constraint rejected the write. Carries the driver's reason.
    #[error("{0}")]
    UniqueViolation(String),
    #[error("Sqlx error: {0}")]
    Sqlx(sqlx::Error),
    #[error("Invalid stored timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Classifies driver errors so callers never inspect error text
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StorageError::UniqueViolation(db_err.message().to_string());
            }
        }
        StorageError::Sqlx(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("quillpad.db"),
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Open (creating if needed) the SQLite database described by `config`
pub async fn connect(config: &DatabaseConfig) -> StorageResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    debug!("Connecting to database: {}", config.path.display());

    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Current time at the precision timestamps are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 text, so lexicographic order is chronological order
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

pub fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StorageError::InvalidTimestamp(raw.to_string()))
}
