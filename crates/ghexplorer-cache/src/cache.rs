use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Persistent store for the favorites set and small preferences
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Survives process restarts without a separate service
/// - Doesn't require a separate process
pub struct CacheManager {
    conn: Connection,
}

impl CacheManager {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Initialize schema on first run
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Throwaway store, mostly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        // seq keeps insertion order, record_id keeps the set unique
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                record_id INTEGER NOT NULL UNIQUE,
                data TEXT NOT NULL,
                added_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Store a favorite. Returns false if the id was already present.
    pub fn add_favorite<T: Serialize>(&self, record_id: u64, record: &T) -> Result<bool> {
        let data = serde_json::to_string(record)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO favorites (record_id, data, added_at) VALUES (?1, ?2, ?3)",
            params![record_id as i64, data, Utc::now().timestamp()],
        )?;
        debug!("add_favorite {} -> inserted={}", record_id, inserted);
        Ok(inserted > 0)
    }

    /// Remove a favorite. Returns false if the id was not stored.
    pub fn remove_favorite(&self, record_id: u64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM favorites WHERE record_id = ?1",
            params![record_id as i64],
        )?;
        debug!("remove_favorite {} -> removed={}", record_id, removed);
        Ok(removed > 0)
    }

    pub fn is_favorite(&self, record_id: u64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM favorites WHERE record_id = ?1",
                params![record_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// All favorites, oldest first
    pub fn get_favorites<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare("SELECT data FROM favorites ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut favorites = Vec::new();
        for row in rows {
            favorites.push(serde_json::from_str(&row?)?);
        }
        Ok(favorites)
    }

    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_setting<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u64,
        name: String,
    }

    fn item(id: u64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_add_and_lookup_favorite() {
        let cache = CacheManager::in_memory().unwrap();
        assert!(!cache.is_favorite(1).unwrap());

        assert!(cache.add_favorite(1, &item(1, "tokio")).unwrap());
        assert!(cache.is_favorite(1).unwrap());
        assert!(!cache.is_favorite(2).unwrap());
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let cache = CacheManager::in_memory().unwrap();
        assert!(cache.add_favorite(1, &item(1, "tokio")).unwrap());
        assert!(!cache.add_favorite(1, &item(1, "tokio")).unwrap());

        let all: Vec<Item> = cache.get_favorites().unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_favorites_keep_insertion_order() {
        let cache = CacheManager::in_memory().unwrap();
        cache.add_favorite(30, &item(30, "c")).unwrap();
        cache.add_favorite(10, &item(10, "a")).unwrap();
        cache.add_favorite(20, &item(20, "b")).unwrap();

        let all: Vec<Item> = cache.get_favorites().unwrap();
        let ids: Vec<u64> = all.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_remove_favorite() {
        let cache = CacheManager::in_memory().unwrap();
        cache.add_favorite(1, &item(1, "tokio")).unwrap();

        assert!(cache.remove_favorite(1).unwrap());
        assert!(!cache.remove_favorite(1).unwrap());
        assert!(!cache.is_favorite(1).unwrap());
    }

    #[test]
    fn test_settings_round_trip_and_overwrite() {
        let cache = CacheManager::in_memory().unwrap();
        assert_eq!(cache.get_setting::<bool>("darkMode").unwrap(), None);

        cache.set_setting("darkMode", &true).unwrap();
        assert_eq!(cache.get_setting::<bool>("darkMode").unwrap(), Some(true));

        cache.set_setting("darkMode", &false).unwrap();
        assert_eq!(cache.get_setting::<bool>("darkMode").unwrap(), Some(false));
    }

    #[test]
    fn test_favorites_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("ghexplorer.db");

        {
            let cache = CacheManager::new(&db_path).unwrap();
            cache.add_favorite(7, &item(7, "serde")).unwrap();
            cache.set_setting("darkMode", &true).unwrap();
        }

        let reopened = CacheManager::new(&db_path).unwrap();
        assert!(reopened.is_favorite(7).unwrap());
        let all: Vec<Item> = reopened.get_favorites().unwrap();
        assert_eq!(all, vec![item(7, "serde")]);
        assert_eq!(reopened.get_setting::<bool>("darkMode").unwrap(), Some(true));
    }
}
