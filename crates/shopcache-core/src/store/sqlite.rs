//! SQLite-backed persistent store.

use super::traits::{CacheBackend, CacheConfig, CacheEntry};
use crate::error::{Result, ShopCacheError};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// SQLite-based store.
///
/// One database file can be opened by several processes at once; WAL mode
/// keeps readers from blocking the writer. Thread-safe via internal mutex
/// on the connection.
pub struct SqliteStore {
    /// Database connection (wrapped for thread safety).
    conn: Arc<Mutex<Connection>>,
    /// Expiry policy.
    config: CacheConfig,
}

impl SqliteStore {
    /// Open (or create) a store at the specified database path.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(db_path, CacheConfig::default())
    }

    /// Open a store with a custom expiry policy.
    pub fn with_config(db_path: impl AsRef<Path>, config: CacheConfig) -> Result<Self> {
        let db_path = db_path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ShopCacheError::io_with_path(e, parent))?;
        }

        let conn = Connection::open(db_path).map_err(|e| ShopCacheError::Store {
            message: format!("Failed to open store database: {}", e),
            source: Some(e),
        })?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| ShopCacheError::Store {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        Self::from_connection(conn, config)
    }

    /// Open a private in-memory database. Nothing is shared across
    /// processes; mostly useful in tests.
    pub fn in_memory(config: CacheConfig) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| ShopCacheError::Store {
            message: format!("Failed to open in-memory database: {}", e),
            source: Some(e),
        })?;
        Self::from_connection(conn, config)
    }

    fn from_connection(conn: Connection, config: CacheConfig) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                cached_at TEXT NOT NULL,
                expires_at TEXT
            );

            -- Index for expiration sweeps
            CREATE INDEX IF NOT EXISTS idx_cache_expires
                ON cache_entries(expires_at);
            "#,
        )
        .map_err(|e| ShopCacheError::Store {
            message: format!("Failed to initialize store schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ShopCacheError::store(format!("Failed to lock database: {}", e)))
    }

    /// The expiry policy this store was opened with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a live entry with its metadata.
    pub fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>> {
        let conn = self.lock()?;
        let now = Utc::now();

        let row: Option<(Vec<u8>, String, Option<String>)> = conn
            .query_row(
                r#"
                SELECT value, cached_at, expires_at
                FROM cache_entries
                WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)
                "#,
                params![key, format_timestamp(now)],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| ShopCacheError::Store {
                message: format!("Failed to query store entry: {}", e),
                source: Some(e),
            })?;

        Ok(row.map(|(value, cached_at, expires_at)| CacheEntry {
            value,
            cached_at: parse_timestamp(&cached_at).unwrap_or(now),
            expires_at: expires_at.as_deref().and_then(parse_timestamp),
        }))
    }

    /// Remove expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn
            .execute(
                "DELETE FROM cache_entries WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                params![format_timestamp(Utc::now())],
            )
            .map_err(|e| ShopCacheError::Store {
                message: format!("Failed to cleanup expired entries: {}", e),
                source: Some(e),
            })?;

        if deleted > 0 {
            debug!("Cleaned up {} expired store entries", deleted);
        }

        Ok(deleted)
    }
}

impl CacheBackend for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.get_entry(key).map(|opt| opt.map(|e| e.value))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let conn = self.lock()?;

        let now = Utc::now();
        let expires_at = self.config.expires_at(now).map(format_timestamp);

        conn.execute(
            r#"
            INSERT OR REPLACE INTO cache_entries (key, value, cached_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![key, value, format_timestamp(now), expires_at],
        )
        .map_err(|e| ShopCacheError::Store {
            message: format!("Failed to set store entry: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let conn = self.lock()?;

        let deleted = conn
            .execute("DELETE FROM cache_entries WHERE key = ?1", params![key])
            .map_err(|e| ShopCacheError::Store {
                message: format!("Failed to delete store entry: {}", e),
                source: Some(e),
            })?;

        Ok(deleted > 0)
    }
}

/// Fixed-width timestamps so SQL string comparison orders them correctly.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
