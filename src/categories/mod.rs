//! Category set
//!
//! The author's categories persist across sessions. The set is read once when
//! the store opens and written back after every change. It is never empty.

mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage};

use thiserror::Error;

/// Storage key holding the JSON array of categories
pub const CATEGORIES_KEY: &str = "vega-writer-categories";

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("at least one category must remain")]
    LastCategory,

    #[error("unknown category: {0}")]
    Unknown(String),

    #[error("failed to persist categories: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Ordered category set backed by a [`Storage`]
#[derive(Debug)]
pub struct CategoryStore<S: Storage> {
    storage: S,
    categories: Vec<String>,
}

impl<S: Storage> CategoryStore<S> {
    /// Open the store, falling back to `defaults` when nothing usable is saved
    pub fn load(storage: S, defaults: &[String]) -> anyhow::Result<Self> {
        let saved = storage.get(CATEGORIES_KEY)?;
        let categories = match saved.as_deref().map(|s| serde_json::from_str::<Vec<String>>(s)) {
            Some(Ok(list)) if !list.is_empty() => list,
            Some(Ok(_)) => {
                tracing::warn!("Saved category list is empty, using defaults");
                defaults.to_vec()
            }
            Some(Err(e)) => {
                tracing::warn!("Saved category list is unreadable, using defaults: {}", e);
                defaults.to_vec()
            }
            None => defaults.to_vec(),
        };

        if categories.is_empty() {
            anyhow::bail!("No categories configured");
        }

        Ok(Self {
            storage,
            categories,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The category a fresh draft starts in
    pub fn first(&self) -> &str {
        &self.categories[0]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Add a category; blank names and duplicates are ignored
    ///
    /// Returns whether the set changed.
    pub fn add(&mut self, name: &str) -> Result<bool, CategoryError> {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return Ok(false);
        }
        let mut next = self.categories.clone();
        next.push(name.to_string());
        self.commit(next)?;
        Ok(true)
    }

    /// Remove a category, refusing to remove the last one
    pub fn remove(&mut self, name: &str) -> Result<(), CategoryError> {
        if self.categories.len() <= 1 {
            return Err(CategoryError::LastCategory);
        }
        let Some(pos) = self.categories.iter().position(|c| c == name) else {
            return Err(CategoryError::Unknown(name.to_string()));
        };
        let mut next = self.categories.clone();
        next.remove(pos);
        self.commit(next)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write `next` to storage, and adopt it only once the write succeeded
    fn commit(&mut self, next: Vec<String>) -> Result<(), CategoryError> {
        let value = serde_json::to_string(&next).map_err(anyhow::Error::from)?;
        self.storage.set(CATEGORIES_KEY, &value)?;
        self.categories = next;
        Ok(())
    }
}
