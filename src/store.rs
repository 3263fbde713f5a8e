use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Note;

/// Key holding the serialized note collection
pub const NOTES_KEY: &str = "cartAdmAnotacoes";

/// Sibling key recording which blob layout wrote the collection
pub const SCHEMA_KEY: &str = "cartAdmAnotacoes:schema";

/// Blob layout written by this build
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create store directory: {0}")]
    DirectoryError(String),
    #[error("Failed to serialize notes: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Invalid notes blob: {0}")]
    InvalidBlob(String),
}

/// String key-value storage with browser local storage semantics
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;

    /// Write several keys in order. Backends that can should make the batch
    /// all-or-nothing; the fallback stops at the first failure.
    fn set_items(&mut self, items: &[(&str, &str)]) -> Result<(), StoreError> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }
}

/// SQLite-backed key-value storage, one row per key
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the storage file and initialize the schema
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let storage = SqliteStorage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let storage = SqliteStorage { conn: Connection::open_in_memory()? };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM local_storage WHERE key = ?1",
            rusqlite::params![key],
        )?;
        Ok(())
    }

    fn set_items(&mut self, items: &[(&str, &str)]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for (key, value) in items {
            tx.execute(
                "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// In-process storage, used by tests and throwaway sessions
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// The note collection, persisted whole under [`NOTES_KEY`].
///
/// There is no partial update: callers load everything, change it in
/// memory and save everything back. Two writers on one backing file
/// overwrite each other; the last save wins.
pub struct NoteStore {
    storage: Box<dyn KeyValueStore>,
}

impl NoteStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Load the collection. Never fails: unreadable storage or a blob that
    /// is not a JSON array yields an empty collection, and records that do
    /// not decode are skipped.
    pub fn load(&self) -> Vec<Note> {
        self.check_schema();

        let blob = match self.storage.get_item(NOTES_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read notes, starting empty");
                return Vec::new();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&blob) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "notes blob is not a JSON array, starting empty");
                return Vec::new();
            }
        };

        let total = records.len();
        let notes: Vec<Note> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Note>(record) {
                Ok(note) => Some(note),
                Err(e) => {
                    warn!(error = %e, "skipping malformed note record");
                    None
                }
            })
            .collect();

        debug!(loaded = notes.len(), skipped = total - notes.len(), "notes loaded");
        notes
    }

    /// Overwrite the stored collection. The schema marker goes first and the
    /// blob last, so a failed save never leaves a new blob behind.
    pub fn save(&mut self, notes: &[Note]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(notes)?;
        let version = SCHEMA_VERSION.to_string();
        self.storage.set_items(&[(SCHEMA_KEY, version.as_str()), (NOTES_KEY, blob.as_str())])?;
        debug!(count = notes.len(), bytes = blob.len(), "notes saved");
        Ok(())
    }

    /// Raw stored blob, `[]` when nothing was saved yet
    pub fn export_blob(&self) -> Result<String, StoreError> {
        Ok(self.storage.get_item(NOTES_KEY)?.unwrap_or_else(|| "[]".to_string()))
    }

    /// Replace the collection with `blob`. Unlike [`NoteStore::load`], this is
    /// strict: every record must decode and ids must be unique.
    pub fn import_blob(&mut self, blob: &str) -> Result<Vec<Note>, StoreError> {
        let notes: Vec<Note> = serde_json::from_str(blob)
            .map_err(|e| StoreError::InvalidBlob(e.to_string()))?;

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = notes.iter().find(|n| !seen.insert(n.id)) {
            return Err(StoreError::InvalidBlob(format!("duplicate note id {}", dup.id)));
        }

        self.save(&notes)?;
        Ok(notes)
    }

    fn check_schema(&self) {
        let stored = match self.storage.get_item(SCHEMA_KEY) {
            Ok(Some(raw)) => raw,
            _ => return,
        };
        match stored.trim().parse::<u32>() {
            Ok(version) if version > SCHEMA_VERSION => {
                warn!(stored = version, supported = SCHEMA_VERSION, "notes were written by a newer schema");
            }
            Ok(_) => {}
            Err(_) => warn!(stored = %stored, "unrecognized notes schema marker"),
        }
    }
}

/// Fresh note id: the current epoch-millisecond timestamp, bumped past the
/// largest existing id so ids stay unique and increasing.
pub fn next_note_id(notes: &[Note], now_millis: i64) -> i64 {
    let max_existing = notes.iter().map(|n| n.id).max().unwrap_or(i64::MIN);
    now_millis.max(max_existing.saturating_add(1))
}
