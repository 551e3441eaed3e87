//! The persisted log of first-per-session utterances.

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// Storage key holding the history log.
pub const HISTORY_KEY: &str = "chatHistory";

/// An ordered list of strings stored as one JSON array under [`HISTORY_KEY`].
///
/// Every operation reads or writes the whole array.  A missing key and a stored
/// JSON `null` both read as an empty log.
pub struct HistoryLog {
    store: Box<dyn KeyValueStore>,
}

impl HistoryLog {
    /// Creates a log over `store`.
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Returns every entry, oldest first.
    pub fn entries(&self) -> Result<Vec<String>> {
        let Some(raw) = self.store.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        let entries: Option<Vec<String>> = serde_json::from_str(&raw).map_err(|err| {
            Error::serialization(
                format!("{HISTORY_KEY} is not a JSON array of strings"),
                Some(Box::new(err)),
            )
        })?;
        Ok(entries.unwrap_or_default())
    }

    /// Appends `entry` to the end of the log.
    ///
    /// Existing entries that cannot be decoded are left untouched and the
    /// append fails.
    pub fn append(&mut self, entry: &str) -> Result<()> {
        let mut entries = self.entries()?;
        entries.push(entry.to_string());
        let raw = serde_json::to_string(&entries)?;
        self.store.set(HISTORY_KEY, &raw)
    }

    /// Removes every entry.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn empty_log() {
        let log = HistoryLog::new(MemoryStore::new());
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn append_preserves_order() {
        let mut log = HistoryLog::new(MemoryStore::new());
        log.append("halo").unwrap();
        log.append("telinga berdenging").unwrap();
        assert_eq!(
            log.entries().unwrap(),
            vec!["halo".to_string(), "telinga berdenging".to_string()]
        );
    }

    #[test]
    fn stored_as_json_array() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, r#"["a","b"]"#).unwrap();
        let mut log = HistoryLog::new(store);
        log.append("c").unwrap();
        assert_eq!(log.store.get(HISTORY_KEY).unwrap().as_deref(), Some(r#"["a","b","c"]"#));
    }

    #[test]
    fn null_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "null").unwrap();
        let log = HistoryLog::new(store);
        assert!(log.entries().unwrap().is_empty());
    }

    #[test]
    fn corrupt_log_is_not_overwritten() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{oops").unwrap();
        let mut log = HistoryLog::new(store);
        assert!(log.entries().unwrap_err().is_serialization());
        assert!(log.append("halo").is_err());
        assert_eq!(log.store.get(HISTORY_KEY).unwrap().as_deref(), Some("{oops"));
    }

    #[test]
    fn clear_removes_everything() {
        let mut log = HistoryLog::new(MemoryStore::new());
        log.append("halo").unwrap();
        log.clear().unwrap();
        assert!(log.entries().unwrap().is_empty());
        log.clear().unwrap();
    }
}
