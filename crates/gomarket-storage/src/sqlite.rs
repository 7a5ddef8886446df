//! # SQLite Storage
//!
//! Key-value storage on top of a SQLite connection pool.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Key-Value Storage                           │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageConfig::new(path) ← Default pool settings                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStorage::new(config).await ← Create pool + run migrations       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  kv_store                                │                           │
//! │  │  key (PK) │ value (TEXT) │ updated_at    │                           │
//! │  │  ─────────┼──────────────┼────────────   │                           │
//! │  │  @GoMarketplace:products │ [...] │ ...   │                           │
//! │  └─────────────────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so the snapshot write
//! does not block concurrent reads, and so a crash mid-write leaves the
//! previous snapshot intact.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::kv::KeyValueStorage;
use crate::migrations;

// =============================================================================
// Configuration
// =============================================================================

/// Storage configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StorageConfig {
///     connect_timeout: Duration::from_secs(5),
///     ..StorageConfig::new("/path/to/gomarket.db")
/// };
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one writer task plus the startup read)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections
    /// open, which an in-memory database requires.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl StorageConfig {
    /// Creates a new storage configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StorageConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// The database lives as long as its single connection, so the pool is
    /// pinned to one connection that never idles out.
    pub fn in_memory() -> Self {
        StorageConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// SqliteStorage
// =============================================================================

/// SQLite-backed [`KeyValueStorage`].
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens the database, configures the pool and runs migrations.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables WAL mode and NORMAL synchronous
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing key-value storage"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        debug!("Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_in_memory() {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Storage pool created"
        );

        let storage = SqliteStorage { pool };

        if config.run_migrations {
            storage.run_migrations().await?;
        }

        Ok(storage)
    }

    /// Runs database migrations.
    pub async fn run_migrations(&self) -> StorageResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of stored keys.
    pub async fn count(&self) -> StorageResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Closes the connection pool. Later operations fail with `Unavailable`.
    pub async fn close(&self) {
        info!("Closing storage connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .is_ok()
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Storage read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Storage write");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, "Storage remove");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> SqliteStorage {
        SqliteStorage::new(StorageConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let storage = storage().await;
        assert!(storage.health_check().await);
        assert_eq!(storage.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let storage = storage().await;
        let (total, applied) = migrations::migration_status(storage.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_set_get_upsert_remove() {
        let storage = storage().await;
        let key = "@GoMarketplace:products";

        assert_eq!(storage.get(key).await.unwrap(), None);

        storage.set(key, "[]").await.unwrap();
        storage.set(key, r#"[{"id":"a"}]"#).await.unwrap();
        assert_eq!(
            storage.get(key).await.unwrap().as_deref(),
            Some(r#"[{"id":"a"}]"#)
        );
        assert_eq!(storage.count().await.unwrap(), 1);

        storage.remove(key).await.unwrap();
        assert_eq!(storage.get(key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let storage = storage().await;
        storage.close().await;
        assert!(!storage.health_check().await);
        assert!(matches!(
            storage.get("k").await,
            Err(StorageError::Unavailable(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = StorageConfig::new("/tmp/test.db");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(600)));
        assert!(config.run_migrations);
        assert!(!config.is_in_memory());

        let memory = StorageConfig::in_memory();
        assert!(memory.is_in_memory());
        assert_eq!(memory.max_connections, 1);
        assert_eq!(memory.idle_timeout, None);
    }
}
