//! Named string slots: the persistence layer under the favorites store.
//!
//! A slot is a single string value stored under a short key. `FileSlots`
//! keeps one file per key in a data directory; `MemorySlots` keeps them in a
//! shared map and is used for tests and ephemeral runs.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors from reading or writing a slot.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),

    #[error("Slot I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Slot storage unavailable: {0}")]
    Unavailable(String),
}

/// String-keyed, string-valued storage.
///
/// Writes replace the whole value. There is no locking across processes:
/// two writers sharing a backend race and the last write wins.
pub trait SlotStorage: Send {
    /// Read a slot. Returns `None` if it has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<(), SlotError>;

    /// Delete a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), SlotError>;
}

fn validate_key(key: &str) -> Result<(), SlotError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SlotError::InvalidKey(key.to_string()))
    }
}

/// File-backed slots: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    /// Use `dir` for slot files. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, SlotError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl SlotStorage for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write next to the target and rename so readers never see a partial value
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Wrote slot {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slots. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemorySlots {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        validate_key(key)?;
        Ok(self.slots.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        validate_key(key)?;
        self.slots.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        validate_key(key)?;
        self.slots.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_slot_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path());
        assert_eq!(slots.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_file_slot_set_then_get() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path().join("nested"));
        slots.set("favorites", "[]").unwrap();
        assert_eq!(slots.get("favorites").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested").join("favorites.json").exists());
    }

    #[test]
    fn test_file_slot_overwrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path());
        slots.set("favorites", "[1]").unwrap();
        slots.set("favorites", "[2]").unwrap();
        assert_eq!(slots.get("favorites").unwrap().as_deref(), Some("[2]"));
        assert!(!dir.path().join(".favorites.json.tmp").exists());
    }

    #[test]
    fn test_file_slot_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path());
        assert!(slots.remove("favorites").is_ok());
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let slots = FileSlots::new(dir.path());
        assert!(matches!(slots.get("../etc"), Err(SlotError::InvalidKey(_))));
        assert!(matches!(slots.set("", "x"), Err(SlotError::InvalidKey(_))));
        assert!(matches!(
            MemorySlots::new().get("a/b"),
            Err(SlotError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_memory_slot_clones_share_state() {
        let a = MemorySlots::new();
        let b = a.clone();
        a.set("favorites", "[]").unwrap();
        assert_eq!(b.get("favorites").unwrap().as_deref(), Some("[]"));
        b.remove("favorites").unwrap();
        assert_eq!(a.get("favorites").unwrap(), None);
    }
}
