//! String key/value store the app persists its small JSON documents in.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Key/value storage for serialized values.
///
/// Readers treat a missing key and an unreadable value the same way, so
/// `get_item` only distinguishes "present" from "absent".
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

// Keys become file names; anything outside a conservative set is replaced.
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() { "_".to_string() } else { stem }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                None
            }
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Volatile storage, used in tests and when the data directory is unusable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("data")).unwrap();

        assert_eq!(storage.get_item("liked_songs"), None);

        storage.set_item("liked_songs", "[1,2]").unwrap();
        assert_eq!(storage.get_item("liked_songs").as_deref(), Some("[1,2]"));
        assert!(dir.path().join("data/liked_songs.json").is_file());
        assert!(!dir.path().join("data/liked_songs.json.tmp").exists());

        storage.set_item("liked_songs", "[]").unwrap();
        assert_eq!(storage.get_item("liked_songs").as_deref(), Some("[]"));

        storage.remove_item("liked_songs").unwrap();
        assert_eq!(storage.get_item("liked_songs"), None);
        storage.remove_item("liked_songs").unwrap();
    }

    #[test]
    fn file_storage_keeps_keys_inside_its_directory() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set_item("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").is_file());
        assert_eq!(storage.get_item("../escape").as_deref(), Some("x"));
    }

    #[test]
    fn memory_storage_behaves_like_a_map() {
        let mut storage = MemoryStorage::new();
        storage.set_item("auth_user", "{}").unwrap();
        assert_eq!(storage.get_item("auth_user").as_deref(), Some("{}"));
        storage.remove_item("auth_user").unwrap();
        assert!(storage.get_item("auth_user").is_none());
    }
}
