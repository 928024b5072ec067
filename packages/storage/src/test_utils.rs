// ABOUTME: Test helpers for crates built on the storage layer
// ABOUTME: Creates a migrated in-memory SQLite pool

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Migrated in-memory database.
///
/// Every connection to `sqlite::memory:` opens a separate database, so the
/// pool is pinned to a single connection that is never recycled.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    crate::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
