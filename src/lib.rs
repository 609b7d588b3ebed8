//! vega-writer: a single-author markdown writing desk
//!
//! Drafts are edited through an [`content::EditorSession`], scored for on-page
//! SEO, and published as front-matter markdown files to a GitHub content
//! repository through the publish server.

pub mod categories;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod publish;
pub mod server;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use categories::{CategoryStore, FileStorage};
use content::{Draft, EditorSession};

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "writer.yml";

/// The writer application rooted at one directory
#[derive(Clone)]
pub struct Writer {
    /// Writer configuration
    pub config: config::WriterConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding draft files
    pub drafts_dir: PathBuf,
    /// Local key-value storage file
    pub storage_path: PathBuf,
}

impl Writer {
    /// Create a writer from a directory, reading `writer.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::WriterConfig::load(&config_path)?
        } else {
            config::WriterConfig::default()
        };

        let drafts_dir = base_dir.join(&config.drafts_dir);
        let storage_path = base_dir.join(&config.storage_path);

        Ok(Self {
            config,
            base_dir,
            drafts_dir,
            storage_path,
        })
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_path)
    }

    pub fn category_store(&self) -> Result<CategoryStore<FileStorage>> {
        CategoryStore::load(self.storage(), &self.config.default_categories)
    }

    /// A session for a new, empty post
    pub fn new_session(&self) -> Result<EditorSession<FileStorage>> {
        EditorSession::new(self.config.clone(), self.storage())
    }

    /// Resolve a draft argument: a path, or a name inside the drafts directory
    pub fn draft_path(&self, name: &str) -> PathBuf {
        let direct = self.base_dir.join(name);
        if direct.is_file() {
            return direct;
        }
        let file = if name.ends_with(helpers::MARKDOWN_EXT) {
            name.to_string()
        } else {
            format!("{}{}", name, helpers::MARKDOWN_EXT)
        };
        self.drafts_dir.join(file)
    }

    /// Open a draft file in a session; the file stem is its slug
    pub fn open_draft(&self, path: &Path) -> Result<EditorSession<FileStorage>> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let draft = Draft::from_markdown_document(&content)?;
        let slug = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty());

        EditorSession::from_draft(self.config.clone(), self.storage(), draft, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path()).unwrap();
        assert_eq!(writer.drafts_dir, dir.path().join("drafts"));
        assert_eq!(
            writer.category_store().unwrap().categories(),
            ["AI", "Marketing", "Development", "Life"]
        );
    }

    #[test]
    fn test_reads_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "site_name: My Notes\ndrafts_dir: wip\ndefault_categories: [Rust]\n",
        )
        .unwrap();

        let writer = Writer::new(dir.path()).unwrap();
        assert_eq!(writer.config.site_name, "My Notes");
        assert_eq!(writer.drafts_dir, dir.path().join("wip"));
        assert_eq!(writer.new_session().unwrap().draft().category, "Rust");
    }

    #[test]
    fn test_open_draft_uses_file_stem_as_slug() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path()).unwrap();
        fs::create_dir_all(&writer.drafts_dir).unwrap();
        let path = writer.drafts_dir.join("hello-abcdefgh.md");
        fs::write(&path, "---\ntitle: \"Hello\"\n---\n\nBody").unwrap();

        assert_eq!(writer.draft_path("hello-abcdefgh"), path);
        let session = writer.open_draft(&path).unwrap();
        assert_eq!(session.slug(), "hello-abcdefgh");
        assert_eq!(session.draft().title, "Hello");
        assert_eq!(session.draft().body, "Body");
    }
}
