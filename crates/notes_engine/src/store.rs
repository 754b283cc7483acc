//! String key-value storage and typed JSON slots on top of it.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Mutex;

use notes_logging::{notes_debug, notes_trace, notes_warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous string store, one value per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    writer: AtomicFileWriter,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir.into()),
        }
    }

    fn filename(key: &str) -> Result<String, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if valid {
            Ok(format!("{key}.json"))
        } else {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.writer.dir().join(Self::filename(key)?);
        notes_trace!("Reading {:?}", path);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.writer.write(&Self::filename(key)?, value)?;
        notes_debug!("Stored {} ({} bytes) at {:?}", key, value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.writer.dir().join(Self::filename(key)?);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store, used by tests and as a fallback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// A JSON value of type `T` kept under one fixed key.
pub struct JsonSlot<'a, T> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
    _value: PhantomData<fn() -> T>,
}

impl<'a, T> JsonSlot<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self {
            store,
            key,
            _value: PhantomData,
        }
    }

    /// Overwrites any previous value.
    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        self.store.set(self.key, &text)
    }

    /// Missing, unreadable and malformed values all read as `None`.
    pub fn load(&self) -> Option<T> {
        let text = match self.store.get(self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                notes_warn!("Failed to read {}: {}", self.key, err);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                notes_warn!("Ignoring malformed value under {}: {}", self.key, err);
                None
            }
        }
    }
}
