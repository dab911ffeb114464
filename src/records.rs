//! Activity records kept in a key-value store.
//!
//! Each record type has one key, `<prefix><type>`, whose value is a JSON
//! array of records in insertion order.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default key prefix for record lists.
pub const DEFAULT_PREFIX: &str = "sport_";

/// Errors from a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt store file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode store file: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored records under {key} are not valid: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),
}

/// String key-value storage with `localStorage` semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as one JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write through a temp file in the same directory, then rename.
    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_string_pretty(items).map_err(StoreError::Encode)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }
}

/// One logged activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub note: String,
}

impl Record {
    pub fn new(date: NaiveDate, duration: u32, note: impl Into<String>) -> Self {
        Self {
            date,
            duration,
            note: note.into(),
        }
    }
}

/// Append-only record lists per record type.
#[derive(Debug, Clone)]
pub struct RecordStore<S: KeyValueStore> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Storage key for a record type.
    pub fn key(&self, kind: &str) -> String {
        format!("{}{}", self.prefix, kind)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All records of `kind`, oldest first. A missing key is an empty list.
    pub fn try_get(&self, kind: &str) -> Result<Vec<Record>, RecordError> {
        let key = self.key(kind);
        match self.store.get_item(&key)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| RecordError::Decode { key, source })
            }
        }
    }

    /// Like [`Self::try_get`], but failures are logged and read as empty.
    pub fn get(&self, kind: &str) -> Vec<Record> {
        self.try_get(kind).unwrap_or_else(|e| {
            warn!("Reading {} records failed: {}", kind, e);
            Vec::new()
        })
    }

    /// Append `record` to the list for `kind`.
    ///
    /// Refuses to write when the existing value cannot be decoded, so a
    /// corrupt list is never replaced by a one-element list.
    pub fn add(&mut self, kind: &str, record: Record) -> Result<(), RecordError> {
        let mut records = self.try_get(kind)?;
        records.push(record);
        let json = serde_json::to_string(&records).map_err(RecordError::Encode)?;
        let key = self.key(kind);
        self.store.set_item(&key, &json)?;
        debug!("{} now has {} record(s)", key, records.len());
        Ok(())
    }
}
