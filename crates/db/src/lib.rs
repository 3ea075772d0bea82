use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod models;
pub mod repositories;
pub mod store;

pub use store::DbStore;

pub type DbPool = sqlx::SqlitePool;

/// Connection string for a private in-memory database.
pub const MEMORY_URL: &str = "sqlite::memory:";

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create a connection pool from a database URL.
///
/// File databases are created on first use and run in WAL mode. In-memory
/// URLs are routed through [`create_memory_pool`] so every query sees the
/// same database. Foreign keys are enforced on every connection.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    if is_memory_url(database_url) {
        return create_memory_pool().await;
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

/// Create a pool over a single in-memory database.
///
/// SQLite gives each connection its own memory database, so the pool holds
/// exactly one connection and never recycles it.
pub async fn create_memory_pool() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(MEMORY_URL)?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending schema migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
