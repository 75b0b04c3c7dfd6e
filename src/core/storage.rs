//! Durable key-value storage used by the persistence bridge.
//!
//! `FileStorage` keeps one JSON file per key under the data directory.
//! `MemoryStorage` (tests only) is a shared in-process map; clones see the same records,
//! which models a second widget instance in the same storage scope.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
#[cfg(test)]
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Text record store scoped to one user/data directory
pub trait Storage {
    /// Read a record; `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a record (last write wins)
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Records stored as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&path).context(format!("Failed to read record {:?}", path))?;
        Ok(Some(contents))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .context(format!("Failed to create storage directory {:?}", self.dir))?;
        // Readers only ever see a complete record: write beside it, then rename over it
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).context(format!("Failed to write record {:?}", tmp))?;
        fs::rename(&tmp, &path).context(format!("Failed to replace record {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("pomodoro-state").unwrap(), None);
    }

    #[test]
    fn test_file_storage_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.set("pomodoro-state", "first").unwrap();
        storage.set("pomodoro-state", "second").unwrap();
        assert_eq!(
            storage.get("pomodoro-state").unwrap().as_deref(),
            Some("second")
        );
        assert!(dir.path().join("nested").join("pomodoro-state.json").exists());
    }

    #[test]
    fn test_file_storage_replaces_record_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        // A partial write from an interrupted run
        std::fs::write(dir.path().join("pomodoro-state.json.tmp"), "{\"tim").unwrap();

        storage.set("pomodoro-state", "{}").unwrap();
        assert_eq!(storage.get("pomodoro-state").unwrap().as_deref(), Some("{}"));

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("pomodoro-state.json")]);
    }

    #[test]
    fn test_memory_storage_clones_share_records() {
        let mut first = MemoryStorage::new();
        let second = first.clone();
        first.set("k", "v").unwrap();
        assert_eq!(second.get("k").unwrap().as_deref(), Some("v"));
    }
}
