//! Database layer for the agenda store.

mod schema;
mod patients;
mod appointments;
mod snapshot;

pub use schema::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use appointments::*;
pub use snapshot::*;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Collection key for patient records.
pub const PATIENTS_KEY: &str = "patients";
/// Collection key for appointment records.
pub const APPOINTMENTS_KEY: &str = "appointments";

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        tracing::debug!("agenda database opened");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema and seed empty collections.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read a whole collection by key.
    pub(crate) fn read_collection<T: DeserializeOwned>(&self, key: &str) -> DbResult<Vec<T>> {
        read_collection(&self.conn, key)
    }

    /// Overwrite a whole collection by key.
    pub(crate) fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> DbResult<()> {
        write_collection(&self.conn, key, records)
    }

    /// Begin a transaction for multi-collection writes.
    pub(crate) fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Get raw connection (for advanced queries).
    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Read and deserialize the collection stored under `key`.
///
/// A missing key reads as an empty collection. A malformed value also reads
/// as empty, with a warning; the other collection stays readable.
pub(crate) fn read_collection<T: DeserializeOwned>(
    conn: &Connection,
    key: &str,
) -> DbResult<Vec<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM collections WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()?;

    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored collection is malformed, reading as empty");
            Ok(Vec::new())
        }
    }
}

/// Serialize `records` and overwrite the collection stored under `key`.
pub(crate) fn write_collection<T: Serialize>(
    conn: &Connection,
    key: &str,
    records: &[T],
) -> DbResult<()> {
    let raw = serde_json::to_string(records)?;
    conn.execute(
        "INSERT OR REPLACE INTO collections (key, value) VALUES (?1, ?2)",
        params![key, raw],
    )?;
    Ok(())
}

/// Next id for a collection: highest existing id plus one, starting at 1.
/// Monotonic, not gap-free after deletions.
pub(crate) fn next_id<I: Iterator<Item = i64>>(ids: I) -> i64 {
    ids.max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_collections_table_exists() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"collections".to_string()));
    }

    #[test]
    fn test_read_missing_key_is_empty() {
        let db = Database::open_in_memory().unwrap();
        let records: Vec<serde_json::Value> = db.read_collection("nonexistent").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_malformed_value_is_empty() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "UPDATE collections SET value = 'not json {{' WHERE key = ?",
                [PATIENTS_KEY],
            )
            .unwrap();

        let records: Vec<serde_json::Value> = db.read_collection(PATIENTS_KEY).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let values = vec![serde_json::json!({"id": 1}), serde_json::json!({"id": 2})];
        db.write_collection(PATIENTS_KEY, &values).unwrap();

        let read: Vec<serde_json::Value> = db.read_collection(PATIENTS_KEY).unwrap();
        assert_eq!(read, values);
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(std::iter::empty()), 1);
        assert_eq!(next_id([1, 2, 3].into_iter()), 4);
        // Gaps do not get reused
        assert_eq!(next_id([1, 7].into_iter()), 8);
    }
}
