//! SQLite connection management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

use crate::error::DbError;

/// Configuration for opening the SQLite store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection URL (e.g. `sqlite://gudang.db` or `sqlite::memory:`).
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a request may wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// How long a writer waits on the database lock before failing.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Derive a file-backed URL from a bare database name.
    pub fn from_name(name: &str) -> Self {
        Self {
            url: format!("sqlite://{name}.db"),
            ..Self::default()
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://gudang.db".into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Owns the connection pool shared by every repository.
#[derive(Clone)]
pub struct DbManager {
    pool: SqlitePool,
}

impl DbManager {
    /// Open (creating if missing) the configured database.
    ///
    /// File-backed stores use the WAL journal so readers never block the
    /// single writer. An in-memory store lives only as long as its one
    /// connection, so the pool is pinned to a single connection that is
    /// never recycled.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(url = %config.url, max_connections = config.max_connections, "Connecting to SQLite");

        let mut options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .busy_timeout(config.busy_timeout);

        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        info!("Successfully connected to SQLite");

        Ok(Self { pool })
    }

    /// Fresh private in-memory database.
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::connect(&DbConfig {
            url: "sqlite::memory:".into(),
            ..DbConfig::default()
        })
        .await
    }

    /// Round-trip a trivial query to prove the store is reachable.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
