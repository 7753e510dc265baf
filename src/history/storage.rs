//! Durable key-value storage for the history.
//!
//! Enum dispatch over the concrete backends, one string value per key.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::paths;

/// Storage backend enum
#[derive(Debug)]
pub enum StorageBackend {
    /// One JSON file per key inside a directory
    File(FileStorage),
    /// Process-local map, nothing survives the process
    Memory(MemoryStorage),
}

impl StorageBackend {
    /// Open file storage rooted at `dir` (created lazily on first write)
    pub fn open_file(dir: impl Into<PathBuf>) -> Self {
        Self::File(FileStorage::new(dir))
    }

    /// Create empty in-memory storage
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStorage::default())
    }

    /// Read the value under `key`, `None` if absent
    pub fn get(&self, key: &str) -> io::Result<Option<String>> {
        match self {
            Self::File(s) => s.get(key),
            Self::Memory(s) => Ok(s.get(key)),
        }
    }

    /// Overwrite the value under `key`
    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        match self {
            Self::File(s) => s.set(key, value),
            Self::Memory(s) => {
                s.set(key, value);
                Ok(())
            }
        }
    }

    /// Remove `key` entirely; removing an absent key is not an error
    pub fn remove(&self, key: &str) -> io::Result<()> {
        match self {
            Self::File(s) => s.remove(key),
            Self::Memory(s) => {
                s.remove(key);
                Ok(())
            }
        }
    }

    /// Get backend name for debugging/logging
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory(_) => "memory",
        }
    }
}

/// Directory-backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(paths::storage_file(&self.dir, key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    // Stage then rename so a crash mid-write never leaves a torn file
    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let staging = paths::storage_staging_file(&self.dir, key);
        fs::write(&staging, value)?;
        fs::rename(&staging, paths::storage_file(&self.dir, key))
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(paths::storage_file(&self.dir, key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}
