//! String-keyed persistent storage
//!
//! Plays the role browser local storage plays for a web editor: a handful of
//! small string values that outlive the session.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A simple key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps every key in one JSON object on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IndexMap<String, String>> {
        if !self.path.exists() {
            return Ok(IndexMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Ignoring corrupt storage file {:?}: {}", self.path, e);
                Ok(IndexMap::new())
            }
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.shift_remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        tracing::debug!("Stored {} in {:?}", key, self.path);
        Ok(())
    }
}

/// In-process storage, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
