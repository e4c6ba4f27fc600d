//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite, plus the
//! `Database` handle that wires services to the pool, the cache, and the
//! error log.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) ─► Database::new(config).await         │
//! │                              │                              │
//! │               ┌──────────────┼──────────────┐               │
//! │               ▼              ▼              ▼               │
//! │          SqlitePool        Cache        ErrorLog            │
//! │               │              │              │               │
//! │               └──────┬───────┴───────┬──────┘               │
//! │                      ▼               ▼                      │
//! │             db.revenue()      db.invoices() ...             │
//! │          (services share the pool, cache and log)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so dashboard reads
//! don't block invoice writes and vice versa.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::{Cache, CacheStats};
use crate::diagnostics::ErrorLog;
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::retry::DEFAULT_RETRY_ATTEMPTS;
use crate::service::{CustomerService, InvoiceService, RevenueService};

// =============================================================================
// Configuration
// =============================================================================

/// Default TTL for cached aggregate reads (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/dashboard.db")
///     .max_connections(5)
///     .cache_ttl(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,

    /// Validity window for cached aggregate reads.
    /// Default: 5 minutes
    pub cache_ttl: Duration,

    /// Attempt count for mutating operations.
    /// Default: 3
    pub retry_attempts: u32,
}

impl DbConfig {
    /// Creates a new database configuration with the given path. The file is
    /// created on first connect if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Sets the cache TTL.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the retry attempt count for mutations.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Isolated instance, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
            cache_ttl: DEFAULT_CACHE_TTL,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing service access.
///
/// Owns the connection pool, the TTL cache, and the error log; services get
/// cheap clones of all three. Constructed per process (or per test) — there
/// is no global instance.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    cache: Cache,
    errors: ErrorLog,
    retry_attempts: u32,
}

impl Database {
    /// Creates a new database handle.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite (WAL mode, NORMAL synchronous, foreign keys on)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    /// 5. Builds the shared cache and error log
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite ships with foreign keys off for backwards compatibility
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            cache_ttl_secs = config.cache_ttl.as_secs(),
            "Database pool created"
        );

        let db = Database {
            pool,
            cache: Cache::new(config.cache_ttl),
            errors: ErrorLog::new(),
            retry_attempts: config.retry_attempts,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent; also called by `new()` unless
    /// disabled in the config.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool, for queries not covered
    /// by the services.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the revenue service.
    pub fn revenue(&self) -> RevenueService {
        RevenueService::new(self.pool.clone(), self.cache.clone(), self.errors.clone())
    }

    /// Returns the invoice service.
    pub fn invoices(&self) -> InvoiceService {
        InvoiceService::new(
            self.pool.clone(),
            self.cache.clone(),
            self.errors.clone(),
            self.retry_attempts,
        )
    }

    /// Returns the customer service.
    pub fn customers(&self) -> CustomerService {
        CustomerService::new(self.pool.clone(), self.cache.clone(), self.errors.clone())
    }

    /// Returns the shared cache handle. Consumers outside the services may
    /// invalidate by key or clear all entries.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Cache entry count and key list.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Returns the error-log handle.
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. Service calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/dashboard.db")
            .max_connections(10)
            .min_connections(2)
            .cache_ttl(Duration::from_secs(60))
            .retry_attempts(5);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.retry_attempts, 5);
    }

    #[tokio::test]
    async fn test_cache_is_shared_across_services() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.cache().set("probe", &1u32);
        assert_eq!(db.cache_stats().size, 1);

        db.cache().clear();
        assert_eq!(db.cache_stats().size, 0);
    }
}
