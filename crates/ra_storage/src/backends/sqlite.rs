use async_trait::async_trait;
use chrono::Utc;
use ra_core::{Error, KeyValueStore, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::memory::expiry_from;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        expires_at INTEGER
    )
    "#,
    "CREATE INDEX IF NOT EXISTS kv_expires_at ON kv (expires_at)",
    // Add future migrations here
];

fn storage_error(context: &str, e: sqlx::Error) -> Error {
    Error::Storage(format!("{}: {}", context, e))
}

/// Durable store backed by a single SQLite file. Expiry is kept as
/// milliseconds since the epoch.
pub struct SqliteStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteStore {
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| storage_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| storage_error(&format!("Failed to run migration {}", i), e))?;
        }

        let store = Self {
            pool,
            db_path: db_path.to_path_buf(),
        };
        let purged = store.purge_expired().await?;
        if purged > 0 {
            tracing::debug!("Purged {} expired entries from {}", purged, store.db_path.display());
        }
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Drop rows whose expiry has passed. Returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM kv WHERE expires_at IS NOT NULL AND expires_at <= ?")
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to purge expired entries", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query(
            "SELECT value FROM kv WHERE key = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(key)
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to read entry", e))?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let expires_at = expiry_from(Utc::now(), ttl).map(|at| at.timestamp_millis());

        sqlx::query("INSERT OR REPLACE INTO kv (key, value, expires_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(value)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to write entry", e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to delete entry", e))?;
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<HashSet<String>> {
        // substr() instead of LIKE so that '%' and '_' in ids match literally.
        let rows = sqlx::query(
            r#"
            SELECT key FROM kv
            WHERE substr(key, 1, ?) = ?
              AND (expires_at IS NULL OR expires_at > ?)
            "#,
        )
        .bind(prefix.chars().count() as i64)
        .bind(prefix)
        .bind(Utc::now().timestamp_millis())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to scan entries", e))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let key: String = row.get("key");
                key.strip_prefix(prefix).map(str::to_string)
            })
            .collect())
    }
}
