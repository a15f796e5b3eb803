//! Persistence of the style-key list between runs.
//!
//! The list is overwritten wholesale on every sync and never merged.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::registry::StyleKey;

/// Error reading or writing a key store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on key store {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Key store {path:?} is not a JSON list of keys: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A simple key/value slot holding the persisted style keys.
pub trait KeyStore {
    /// Loads the stored keys. A store that was never written yields no keys.
    ///
    /// # Errors
    /// Returns `StoreError` if the store exists but cannot be read.
    fn load(&self) -> Result<Vec<StyleKey>, StoreError>;

    /// Replaces the stored keys.
    ///
    /// # Errors
    /// Returns `StoreError` if the store cannot be written.
    fn save(&self, keys: &[StyleKey]) -> Result<(), StoreError>;
}

/// Key store backed by a JSON array on disk.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    /// Creates a store at `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> Result<Vec<StyleKey>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(store.path = %self.path.display(), "Key store not synced yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        let keys: Option<Vec<StyleKey>> =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(keys.unwrap_or_default())
    }

    fn save(&self, keys: &[StyleKey]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(keys).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }
        fs::write(&self.path, json).map_err(|err| self.io_error(err))?;
        debug!(store.path = %self.path.display(), store.keys = keys.len(), "Key store written");
        Ok(())
    }
}

/// In-memory key store.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: RefCell<Option<Vec<StyleKey>>>,
}

impl MemoryKeyStore {
    /// Creates an empty, never-written store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `keys`.
    pub fn with_keys(keys: impl IntoIterator<Item = StyleKey>) -> Self {
        Self {
            keys: RefCell::new(Some(keys.into_iter().collect())),
        }
    }

    /// Whether the store was ever written.
    pub fn is_written(&self) -> bool {
        self.keys.borrow().is_some()
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self) -> Result<Vec<StyleKey>, StoreError> {
        Ok(self.keys.borrow().clone().unwrap_or_default())
    }

    fn save(&self, keys: &[StyleKey]) -> Result<(), StoreError> {
        *self.keys.borrow_mut() = Some(keys.to_vec());
        Ok(())
    }
}
