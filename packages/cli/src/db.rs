// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use std::sync::Arc;

use quillpad_security::TokenStorage;
use quillpad_storage::{DatabaseConfig, StorageError};
use quillpad_tags::TagStorage;
use sqlx::SqlitePool;
use tracing::info;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub tag_storage: Arc<TagStorage>,
    pub token_storage: Arc<TokenStorage>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            tag_storage: Arc::new(TagStorage::new(pool.clone())),
            token_storage: Arc::new(TokenStorage::new(pool)),
        }
    }

    /// Connect to the configured database and bring its schema up to date
    pub async fn init(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = quillpad_storage::connect(config).await?;
        quillpad_storage::run_migrations(&pool).await?;

        info!("Database ready at {}", config.path.display());

        Ok(Self::new(pool))
    }
}
