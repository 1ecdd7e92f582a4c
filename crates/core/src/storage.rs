//! High-score storage.
//!
//! The core never touches ambient globals: the high score lives behind the
//! [`HighScoreStore`] capability. [`JsonFileStore`] keeps it in a small JSON
//! object on disk (`{"highscore":"120"}`), [`MemoryStore`] keeps it in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::StorageError;
use crate::types::HIGHSCORE_KEY;

/// Durable storage for the single `highscore` integer.
pub trait HighScoreStore {
    /// Stored value, `None` when nothing was stored yet.
    fn get(&self) -> Result<Option<u64>, StorageError>;

    fn set(&mut self, value: u64) -> Result<(), StorageError>;
}

/// In-memory store, mostly for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u64) -> Self {
        Self { value: Some(value) }
    }
}

impl HighScoreStore for MemoryStore {
    fn get(&self) -> Result<Option<u64>, StorageError> {
        Ok(self.value)
    }

    fn set(&mut self, value: u64) -> Result<(), StorageError> {
        self.value = Some(value);
        Ok(())
    }
}

/// Key-value JSON file; values are string-encoded.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn get(&self) -> Result<Option<u64>, StorageError> {
        let map = self.read_map()?;
        match map.get(HIGHSCORE_KEY) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| StorageError::Corrupt(raw.clone())),
        }
    }

    fn set(&mut self, value: u64) -> Result<(), StorageError> {
        // Keep unrelated keys other tools may have written.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "high score file unreadable, rewriting it without its other keys"
                );
                BTreeMap::new()
            }
        };
        map.insert(HIGHSCORE_KEY.to_string(), value.to_string());
        let text = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn get(&self) -> Result<Option<u64>, StorageError> {
        (**self).get()
    }

    fn set(&mut self, value: u64) -> Result<(), StorageError> {
        (**self).set(value)
    }
}
