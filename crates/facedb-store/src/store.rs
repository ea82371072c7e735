//! SQLite-backed face store.

use crate::schema;
use facedb_core::FaceRecord;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot open face store at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("table `known_faces` does not exist; run `facedb init` first")]
    SchemaMissing,
    #[error("face name must not be empty")]
    EmptyName,
    #[error("face encoding must not be empty")]
    EmptyEncoding,
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Owned connection to the face database.
///
/// The connection runs in autocommit mode, so every [`insert`](Self::insert)
/// is durable as soon as it returns. Dropping the store closes it.
pub struct FaceStore {
    conn: Connection,
}

impl FaceStore {
    /// Open a database file, creating it if it does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "face store opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Drop `known_faces` and recreate it empty. All stored faces are lost.
    pub fn reset_schema(&self) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(schema::RESET_SCHEMA)?;
        tx.commit()?;
        tracing::info!(table = schema::TABLE, "schema reset");
        Ok(())
    }

    pub fn has_schema(&self) -> Result<bool, StoreError> {
        let n: i64 = self
            .conn
            .query_row(schema::TABLE_EXISTS, [schema::TABLE], |row| row.get(0))?;
        Ok(n > 0)
    }

    /// Fail with [`StoreError::SchemaMissing`] unless the table exists.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        if self.has_schema()? {
            Ok(())
        } else {
            Err(StoreError::SchemaMissing)
        }
    }

    /// Append one face and return its id.
    pub fn insert(&self, name: &str, encoding: &[u8]) -> Result<i64, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if encoding.is_empty() {
            return Err(StoreError::EmptyEncoding);
        }
        self.conn.execute(schema::INSERT_FACE, params![name, encoding])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All faces, or only those stored under `name`, in insertion order.
    pub fn list(&self, name: Option<&str>) -> Result<Vec<FaceRecord>, StoreError> {
        let records = match name {
            Some(name) => {
                let mut stmt = self.conn.prepare(schema::SELECT_BY_NAME)?;
                let rows = stmt.query_map([name], row_to_record)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(schema::SELECT_ALL)?;
                let rows = stmt.query_map([], row_to_record)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(records)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self.conn.query_row(schema::COUNT_FACES, [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Close the connection, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FaceRecord> {
    Ok(FaceRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        encoding: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> FaceStore {
        let store = FaceStore::open_in_memory().unwrap();
        store.reset_schema().unwrap();
        store
    }

    #[test]
    fn test_new_database_has_no_schema() {
        let store = FaceStore::open_in_memory().unwrap();
        assert!(!store.has_schema().unwrap());
        assert!(matches!(store.ensure_schema(), Err(StoreError::SchemaMissing)));
    }

    #[test]
    fn test_reset_creates_empty_table() {
        let store = fresh();
        assert!(store.has_schema().unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_reset_twice_discards_rows() {
        let store = fresh();
        store.insert("Alice", &[1, 2, 3, 4]).unwrap();
        store.insert("Bob", &[5, 6, 7, 8]).unwrap();
        assert_eq!(store.count().unwrap(), 2);

        store.reset_schema().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        store.reset_schema().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = fresh();
        let a = store.insert("Alice", &[1, 0, 0, 0]).unwrap();
        let b = store.insert("Alice", &[1, 0, 0, 0]).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        // AUTOINCREMENT: a removed max id is never handed out again.
        let store = fresh();
        let first = store.insert("Alice", &[1, 0, 0, 0]).unwrap();
        store
            .conn
            .execute("DELETE FROM known_faces WHERE id = ?1", [first])
            .unwrap();
        let second = store.insert("Alice", &[1, 0, 0, 0]).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let store = fresh();
        store.insert("Alice", &[9, 9, 9, 9]).unwrap();
        store.insert("Alice", &[9, 9, 9, 9]).unwrap();
        let rows = store.list(Some("Alice")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].encoding, rows[1].encoding);
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[test]
    fn test_encoding_bytes_round_trip_exactly() {
        let store = fresh();
        let payload: Vec<u8> = (0..=255).collect();
        let id = store.insert("Alice", &payload).unwrap();
        let rows = store.list(None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].encoding, payload);
    }

    #[test]
    fn test_list_filters_by_name() {
        let store = fresh();
        store.insert("Alice", &[1, 1, 1, 1]).unwrap();
        store.insert("Bob", &[2, 2, 2, 2]).unwrap();
        store.insert("Alice", &[3, 3, 3, 3]).unwrap();

        let alice = store.list(Some("Alice")).unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.name == "Alice"));
        assert_eq!(store.list(Some("Carol")).unwrap().len(), 0);
        assert_eq!(store.list(None).unwrap().len(), 3);
    }

    #[test]
    fn test_insert_rejects_empty_name() {
        let store = fresh();
        assert!(matches!(store.insert("", &[1, 2, 3, 4]), Err(StoreError::EmptyName)));
        assert!(matches!(store.insert("  ", &[1, 2, 3, 4]), Err(StoreError::EmptyName)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_empty_encoding() {
        let store = fresh();
        assert!(matches!(store.insert("Alice", &[]), Err(StoreError::EmptyEncoding)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_without_schema_fails() {
        let store = FaceStore::open_in_memory().unwrap();
        assert!(matches!(store.insert("Alice", &[1, 2, 3, 4]), Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faces.db");

        let store = FaceStore::open(&path).unwrap();
        store.reset_schema().unwrap();
        store.insert("Alice", &[4, 3, 2, 1]).unwrap();
        store.close().unwrap();

        let store = FaceStore::open(&path).unwrap();
        assert!(store.has_schema().unwrap());
        assert_eq!(store.list(None).unwrap()[0].encoding, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_open_in_missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/faces.db");
        assert!(matches!(FaceStore::open(&path), Err(StoreError::Unavailable { .. })));
    }
}
