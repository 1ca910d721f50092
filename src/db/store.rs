//! Namespaced key-value persistence
//!
//! State sections are stored as JSON documents keyed by name under a
//! versioned namespace. Loads never fail: missing rows, database errors,
//! and corrupt JSON all fall back to a caller-supplied default.

use rusqlite::params;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::connection::{Database, DbResult};

/// Namespace prefix for every stored key
const NAMESPACE: &str = "recipe_planner.v1";

/// Key-value store over the pooled database
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn key(name: &str) -> String {
        format!("{NAMESPACE}:{name}")
    }

    /// Load a named value, falling back on missing or corrupt data
    pub fn load<T: DeserializeOwned>(&self, name: &str, fallback: T) -> T {
        let raw = match self.get_raw(name) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(name, error = %e, "storage load failed");
                return fallback;
            }
        };

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => value,
                Err(e) => {
                    warn!(name, error = %e, "stored value is corrupt, using fallback");
                    fallback
                }
            },
            None => fallback,
        }
    }

    /// Save a named value as JSON, inserting or replacing
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> DbResult<()> {
        let json = serde_json::to_string(value)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = datetime('now')",
                params![Self::key(name), json],
            )?;
            Ok(())
        })
    }

    /// Remove a named value if present
    pub fn remove(&self, name: &str) -> DbResult<()> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", [Self::key(name)])?;
            Ok(())
        })
    }

    fn get_raw(&self, name: &str) -> DbResult<Option<String>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
            let result = stmt.query_row([Self::key(name)], |row| row.get(0));
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Write a raw (possibly non-JSON) value. Test hook for corruption cases.
    #[cfg(test)]
    pub fn save_raw(&self, name: &str, raw: &str) -> DbResult<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = datetime('now')",
                params![Self::key(name), raw],
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_store() -> (Store, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        (Store::new(db), dir)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (store, _dir) = test_store();
        store.save("numbers", &vec![1, 2, 3]).unwrap();
        let loaded: Vec<i32> = store.load("numbers", Vec::new());
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_key_falls_back() {
        let (store, _dir) = test_store();
        let loaded: Vec<String> = store.load("absent", vec!["default".to_string()]);
        assert_eq!(loaded, vec!["default".to_string()]);
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let (store, _dir) = test_store();
        store.save_raw("broken", "{not json").unwrap();
        let loaded: Vec<i32> = store.load("broken", vec![7]);
        assert_eq!(loaded, vec![7]);
    }

    #[test]
    fn test_save_replaces_existing() {
        let (store, _dir) = test_store();
        store.save("value", &"first").unwrap();
        store.save("value", &"second").unwrap();
        let loaded: String = store.load("value", String::new());
        assert_eq!(loaded, "second");
    }

    #[test]
    fn test_remove() {
        let (store, _dir) = test_store();
        store.save("gone", &1).unwrap();
        store.remove("gone").unwrap();
        let loaded: i32 = store.load("gone", 0);
        assert_eq!(loaded, 0);
    }
}
