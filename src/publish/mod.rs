//! Publishing posts to the content repository
//!
//! A publish is a read-modify-write against the GitHub contents API: read the
//! file to learn its current `sha`, then write the new content carrying that
//! `sha` so GitHub treats it as an update. The pair is not atomic. A stale or
//! missing `sha` is caught by GitHub's own version check and surfaced as an
//! upstream error; nothing here retries.

mod client;
mod error;
mod github;

pub use client::{ClientError, PublishClient};
pub use error::{PublishError, MISSING_FIELDS};
pub use github::{
    ContentsApi, GitHubContents, PutFileRequest, PutFileResponse, RemoteFile, UpstreamError,
};

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

use crate::config::WriterConfig;
use crate::helpers::post_url;

/// Header carrying the shared writer secret
pub const WRITER_KEY_HEADER: &str = "x-writer-key";

/// Message returned for filenames that could escape the posts directory
pub const INVALID_FILENAME: &str = "Invalid filename";

/// Body of `POST /api/publish`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PublishRequest {
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.filename.is_empty() || self.content.is_empty() {
            return Err(PublishError::missing_fields());
        }
        if self.filename.contains(['/', '\\']) || self.filename.contains("..") {
            return Err(PublishError::Validation(INVALID_FILENAME.to_string()));
        }
        Ok(())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Successful publish response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub success: bool,
    /// Repository path written
    pub path: String,
    /// Public URL of the post
    pub url: String,
}

/// What the existence check learned about the target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistingFile {
    /// The file exists at this revision
    Found { sha: String },
    /// The host reports no such file
    Missing,
    /// The check failed; treated like [`ExistingFile::Missing`]
    Unknown { reason: String },
}

impl ExistingFile {
    pub fn sha(&self) -> Option<&str> {
        match self {
            ExistingFile::Found { sha } => Some(sha.as_str()),
            _ => None,
        }
    }
}

/// Creates or updates post files in the configured repository
#[derive(Clone)]
pub struct Publisher {
    contents: Arc<dyn ContentsApi>,
    config: WriterConfig,
}

impl Publisher {
    pub fn new(contents: Arc<dyn ContentsApi>, config: WriterConfig) -> Self {
        Self { contents, config }
    }

    /// Publisher talking to the GitHub API named in the config
    pub fn github(config: WriterConfig) -> Self {
        let contents = GitHubContents::new(reqwest::Client::new(), &config.repository);
        Self::new(Arc::new(contents), config)
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Look up the current revision of `path`
    pub async fn check_existing(&self, token: &str, path: &str) -> ExistingFile {
        match self.contents.get_file(token, path).await {
            Ok(RemoteFile { sha: Some(sha), .. }) => ExistingFile::Found { sha },
            Ok(_) => ExistingFile::Unknown {
                reason: "response carried no sha".to_string(),
            },
            Err(e) if e.is_not_found() => ExistingFile::Missing,
            Err(e) => ExistingFile::Unknown {
                reason: e.to_string(),
            },
        }
    }

    /// Create or update one post file
    pub async fn publish(
        &self,
        token: &str,
        request: PublishRequest,
    ) -> Result<PublishReceipt, PublishError> {
        request.validate()?;

        let repository = &self.config.repository;
        let path = repository.file_path(&request.filename);

        let existing = self.check_existing(token, &path).await;
        match &existing {
            ExistingFile::Found { sha } => tracing::debug!("Updating {} at {}", path, sha),
            ExistingFile::Missing => tracing::debug!("Creating {}", path),
            ExistingFile::Unknown { reason } => {
                tracing::warn!("Could not read {} ({}), writing it as a new file", path, reason)
            }
        }

        let message = request
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.commit_message_for_file(&request.filename));

        let put = PutFileRequest {
            message,
            content: BASE64_STANDARD.encode(request.content.as_bytes()),
            branch: repository.branch.clone(),
            sha: existing.sha().map(str::to_string),
        };

        let response = self.contents.put_file(token, &path, &put).await?;
        let written = response.content.and_then(|c| c.path).unwrap_or(path);
        let url = post_url(&self.config, &request.filename);

        tracing::info!("Published {} -> {}", written, url);
        Ok(PublishReceipt {
            success: true,
            path: written,
            url,
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory contents API for tests

    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers reads with a canned result and records every write
    pub struct FakeContents {
        read: Result<RemoteFile, UpstreamError>,
        write: Result<PutFileResponse, UpstreamError>,
        pub writes: Mutex<Vec<(String, PutFileRequest)>>,
    }

    impl FakeContents {
        pub fn new(read: Result<RemoteFile, UpstreamError>) -> Self {
            Self {
                read,
                write: Ok(PutFileResponse::default()),
                writes: Mutex::new(Vec::new()),
            }
        }

        pub fn missing() -> Self {
            Self::new(Err(UpstreamError::Rejected {
                status: 404,
                message: "Not Found".to_string(),
            }))
        }

        pub fn existing(sha: &str) -> Self {
            Self::new(Ok(RemoteFile {
                path: None,
                sha: Some(sha.to_string()),
            }))
        }

        pub fn with_write(mut self, write: Result<PutFileResponse, UpstreamError>) -> Self {
            self.write = write;
            self
        }

        pub fn last_write(&self) -> Option<(String, PutFileRequest)> {
            self.writes.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ContentsApi for FakeContents {
        async fn get_file(&self, _token: &str, _path: &str) -> Result<RemoteFile, UpstreamError> {
            self.read.clone()
        }

        async fn put_file(
            &self,
            _token: &str,
            path: &str,
            request: &PutFileRequest,
        ) -> Result<PutFileResponse, UpstreamError> {
            self.writes
                .lock()
                .unwrap()
                .push((path.to_string(), request.clone()));
            self.write.clone()
        }
    }
}
