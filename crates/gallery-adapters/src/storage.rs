//! Index storage adapter
//!
//! A small key-value preferences table in SQLite. The gallery index is one
//! entry in it, stored as JSON text under the configured key.

use async_trait::async_trait;
use gallery_core::ports::index::{IndexError, IndexStorePort};
use rusqlite::OptionalExtension;
use std::path::Path;
use tokio_rusqlite::Connection;

const CREATE_PREFERENCES_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)
"#;

const UPSERT_PREFERENCE_SQL: &str = r#"
INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#;

/// SQLite adapter implementing IndexStorePort
pub struct SqliteIndexStore {
    conn: Connection,
}

impl SqliteIndexStore {
    /// Opens (or creates) the database at `db_path` and initializes the schema
    ///
    /// # Errors
    /// Returns `IndexError::ConnectionError` if the database cannot be opened
    pub async fn new(db_path: &Path) -> Result<Self, IndexError> {
        let path_str = db_path.to_string_lossy().to_string();

        let conn = Connection::open(&path_str)
            .await
            .map_err(|e| IndexError::ConnectionError(e.to_string()))?;

        Self::initialize_schema(&conn).await?;

        tracing::info!("Index database opened at {}", path_str);
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open(":memory:")
            .await
            .map_err(|e| IndexError::ConnectionError(e.to_string()))?;

        Self::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn initialize_schema(conn: &Connection) -> Result<(), IndexError> {
        conn.call(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute(CREATE_PREFERENCES_TABLE_SQL, [])?;
            Ok(())
        })
        .await
        .map_err(|e| IndexError::DatabaseError(e.to_string()))
    }

    /// Unix timestamp (seconds) of the last write to `key`, if any
    pub async fn last_updated(&self, key: &str) -> Result<Option<i64>, IndexError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                let updated = conn
                    .query_row(
                        "SELECT updated_at FROM preferences WHERE key = ?1",
                        [&key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(updated)
            })
            .await
            .map_err(|e| IndexError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl IndexStorePort for SqliteIndexStore {
    async fn get(&self, key: &str) -> Result<Option<String>, IndexError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM preferences WHERE key = ?1",
                        [&key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(|e| IndexError::DatabaseError(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), IndexError> {
        let key = key.to_string();
        let value = value.to_string();
        let value_len = value.len();
        let updated_at = chrono::Utc::now().timestamp();
        self.conn
            .call(move |conn| {
                conn.execute(
                    UPSERT_PREFERENCE_SQL,
                    rusqlite::params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| IndexError::DatabaseError(e.to_string()))?;

        tracing::debug!("Index entry written ({} bytes)", value_len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("gallery.db");

        assert!(!db_path.exists());

        let _store = SqliteIndexStore::new(&db_path)
            .await
            .expect("Failed to create store");

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let store = SqliteIndexStore::new_in_memory().await.unwrap();

        assert_eq!(store.get("photos").await.unwrap(), None);
        assert_eq!(store.last_updated("photos").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = SqliteIndexStore::new_in_memory().await.unwrap();
        let value = r#"[{"filepath":"1.jpeg","webviewPath":"data:image/jpeg;base64,QQ=="}]"#;

        let before = chrono::Utc::now().timestamp();
        store.set("photos", value).await.unwrap();
        let after = chrono::Utc::now().timestamp();

        assert_eq!(store.get("photos").await.unwrap().as_deref(), Some(value));
        let updated = store.last_updated("photos").await.unwrap().unwrap();
        assert!((before..=after).contains(&updated));
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let store = SqliteIndexStore::new_in_memory().await.unwrap();

        store.set("photos", "[]").await.unwrap();
        store.set("photos", r#"[{"filepath":"2.jpeg"}]"#).await.unwrap();

        assert_eq!(
            store.get("photos").await.unwrap().as_deref(),
            Some(r#"[{"filepath":"2.jpeg"}]"#)
        );
        let rows = store
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = SqliteIndexStore::new_in_memory().await.unwrap();

        store.set("photos", "[]").await.unwrap();
        store.set("other", "x").await.unwrap();

        assert_eq!(store.get("photos").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("other").await.unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_wal_mode_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteIndexStore::new(&temp_dir.path().join("gallery.db"))
            .await
            .unwrap();

        let mode = store
            .conn
            .call(|conn| {
                let mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
                Ok(mode)
            })
            .await
            .expect("Failed to query journal mode");

        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_value_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("gallery.db");

        {
            let store = SqliteIndexStore::new(&db_path).await.unwrap();
            store.set("photos", r#"[{"filepath":"a.jpeg"}]"#).await.unwrap();
        }

        let store = SqliteIndexStore::new(&db_path).await.unwrap();
        assert_eq!(
            store.get("photos").await.unwrap().as_deref(),
            Some(r#"[{"filepath":"a.jpeg"}]"#)
        );
    }
}
