//! Single-key string storage, the shape browser `localStorage` has.
//!
//! Session state is a convenience, not a source of truth: every read failure
//! degrades to "key absent" and every write failure is logged and swallowed.

use std::io::Write;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory storage for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Durable storage: one file per key under a directory. Survives restarts the
/// way `localStorage` survives reloads.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are short identifiers; anything path-hostile gets flattened.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(safe)
    }

    fn try_set(&self, path: &Path, value: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(value.as_bytes())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let path = self.key_path(key);
        if let Err(err) = self.try_set(&path, value) {
            tracing::warn!(key, path = %path.display(), %err, "storage write failed");
        }
    }

    fn remove(&mut self, key: &str) {
        let path = self.key_path(key);
        if let Err(err) = std::fs::remove_file(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, path = %path.display(), %err, "storage remove failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("theme"), None);
        storage.set("theme", "dark");
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
        storage.remove("theme");
        assert_eq!(storage.get("theme"), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = FileStorage::new(dir.path());
            storage.set("sessionState", r#"{"refreshed":true}"#);
        }
        let storage = FileStorage::new(dir.path());
        assert_eq!(
            storage.get("sessionState").as_deref(),
            Some(r#"{"refreshed":true}"#)
        );
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("absent"), None);
        // removing an absent key is not an error
        storage.remove("absent");
    }

    #[test]
    fn test_hostile_key_is_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("../escape", "v");
        assert_eq!(storage.get("../escape").as_deref(), Some("v"));
        assert!(dir.path().join("___escape").exists());
    }
}
