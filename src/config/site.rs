//! Writer configuration (writer.yml)

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Starter body placed in every new post
const STARTER_BODY: &str = "## Introduction

Write your opening here...

## First point

Content...

## Second point

Content...

## Conclusion

Sum up your thoughts...";

/// Main writer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    // Site
    pub site_name: String,
    pub url: String,
    pub posts_dir: String,
    pub author: String,
    pub timezone: String,

    // Writing
    pub default_categories: Vec<String>,
    pub starter_body: String,
    pub drafts_dir: String,
    pub storage_path: String,

    // Publishing
    pub endpoint: String,
    /// Commit message used by the endpoint when the caller sends none; `{filename}` is substituted
    pub commit_message: String,
    /// Commit message sent by the client; `{title}` is substituted
    pub client_commit_message: String,
    #[serde(default)]
    pub repository: RepositoryConfig,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            site_name: "Vega Note".to_string(),
            url: "https://example.com".to_string(),
            posts_dir: "posts".to_string(),
            author: "Vega".to_string(),
            timezone: String::new(),

            default_categories: vec![
                "AI".to_string(),
                "Marketing".to_string(),
                "Development".to_string(),
                "Life".to_string(),
            ],
            starter_body: STARTER_BODY.to_string(),
            drafts_dir: "drafts".to_string(),
            storage_path: ".vega-writer/storage.json".to_string(),

            endpoint: "http://127.0.0.1:3000/api/publish".to_string(),
            commit_message: "Add post: {filename}".to_string(),
            client_commit_message: "Add post: {title}".to_string(),
            repository: RepositoryConfig::default(),
        }
    }
}

impl WriterConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: WriterConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would break every draft or publish
    pub fn validate(&self) -> Result<()> {
        if self.default_categories.iter().all(|c| c.trim().is_empty()) {
            anyhow::bail!("default_categories must contain at least one category");
        }
        if !self.timezone.is_empty() {
            self.timezone
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid timezone {:?}: {}", self.timezone, e))?;
        }
        Ok(())
    }

    /// Today's date in the configured timezone (UTC when unset)
    pub fn today(&self) -> NaiveDate {
        let now = Utc::now();
        match self.timezone.parse::<Tz>() {
            Ok(tz) if !self.timezone.is_empty() => now.with_timezone(&tz).date_naive(),
            _ => now.date_naive(),
        }
    }

    /// Endpoint commit message for a file
    pub fn commit_message_for_file(&self, filename: &str) -> String {
        self.commit_message.replace("{filename}", filename)
    }

    /// Client commit message for a post title
    pub fn commit_message_for_title(&self, title: &str) -> String {
        self.client_commit_message.replace("{title}", title)
    }
}

/// Target content repository on GitHub
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub posts_path: String,
    pub api_base: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: "vega-create".to_string(),
            name: "vega-note".to_string(),
            branch: "main".to_string(),
            posts_path: "src/content/posts".to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Repository path of a post file
    pub fn file_path(&self, filename: &str) -> String {
        let dir = self.posts_path.trim_matches('/');
        if dir.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", dir, filename)
        }
    }
}
