//! Durable key-value storage.
//!
//! The chat keeps its history the way a browser keeps `localStorage`: string
//! values under string keys, each value read and written whole.  [`FileStore`]
//! keeps every key in one JSON object on disk; [`MemoryStore`] keeps them in
//! process.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// String-valued storage addressed by key.
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`.  Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// A [`KeyValueStore`] held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A [`KeyValueStore`] backed by a single JSON object file.
///
/// A missing file reads as an empty store.  Writes replace the file through a
/// temporary sibling and a rename, creating parent directories as needed.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at `path`.  Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(Error::io(
                    format!("failed to read {}", self.path.display()),
                    err,
                ));
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|err| {
            Error::serialization(
                format!("failed to parse {}", self.path.display()),
                Some(Box::new(err)),
            )
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| {
                Error::io(format!("failed to create {}", parent.display()), err)
            })?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)
            .map_err(|err| Error::io(format!("failed to write {}", tmp.display()), err))?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            Error::io(format!("failed to replace {}", self.path.display()), err)
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// An unparseable file cannot be edited key by key, so removing from one
    /// resets it to an empty object.
    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(err) if err.is_serialization() => {
                tracing::warn!(path = %self.path.display(), error = %err, "resetting unreadable store");
                return self.write_all(&BTreeMap::new());
            }
            Err(err) => return Err(err),
        };
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
