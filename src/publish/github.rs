//! GitHub contents API
//!
//! Only the two calls publishing needs: read a file's metadata and create or
//! update a file. Updates must carry the `sha` of the revision they replace;
//! GitHub refuses the write otherwise.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RepositoryConfig;
use crate::helpers::encode_path;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

const CLIENT_AGENT: &str = concat!("vega-writer/", env!("CARGO_PKG_VERSION"));

/// A failed call to the repository host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The host answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never got an answer
    #[error("request to repository host failed: {0}")]
    Transport(String),

    /// The host answered with a body we could not read
    #[error("unexpected response from repository host: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::Rejected { status: 404, .. })
    }
}

/// File metadata returned by the contents API
///
/// Both fields are optional: a directory listing or an odd payload must not
/// be mistaken for a file with a version token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
}

/// Body of a create-or-update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutFileRequest {
    pub message: String,
    /// Base64 of the UTF-8 file content
    pub content: String,
    pub branch: String,
    /// Present only when updating an existing file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PutFileResponse {
    #[serde(default)]
    pub content: Option<RemoteFile>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Repository contents operations used by the publisher
#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// Read the metadata of the file at `path`
    async fn get_file(&self, token: &str, path: &str) -> Result<RemoteFile, UpstreamError>;

    /// Create or update the file at `path`
    async fn put_file(
        &self,
        token: &str,
        path: &str,
        request: &PutFileRequest,
    ) -> Result<PutFileResponse, UpstreamError>;
}

/// reqwest-backed GitHub contents client
#[derive(Debug, Clone)]
pub struct GitHubContents {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    branch: String,
}

impl GitHubContents {
    pub fn new(client: reqwest::Client, repository: &RepositoryConfig) -> Self {
        Self {
            client,
            api_base: repository.api_base.trim_end_matches('/').to_string(),
            owner: repository.owner.clone(),
            repo: repository.name.clone(),
            branch: repository.branch.clone(),
        }
    }

    fn file_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            encode_path(&self.owner),
            encode_path(&self.repo),
            encode_path(path.trim_start_matches('/'))
        )
    }
}

#[async_trait]
impl ContentsApi for GitHubContents {
    async fn get_file(&self, token: &str, path: &str) -> Result<RemoteFile, UpstreamError> {
        let response = self
            .client
            .get(self.file_url(path))
            .query(&[("ref", self.branch.as_str())])
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_AGENT)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json::<RemoteFile>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    async fn put_file(
        &self,
        token: &str,
        path: &str,
        request: &PutFileRequest,
    ) -> Result<PutFileResponse, UpstreamError> {
        let response = self
            .client
            .put(self.file_url(path))
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_AGENT)
            .json(request)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json::<PutFileResponse>()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Turn an error response into [`UpstreamError::Rejected`], keeping GitHub's message
async fn rejection(response: reqwest::Response) -> UpstreamError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message,
        Err(_) if !text.trim().is_empty() => text.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };

    UpstreamError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FILE_PATH: &str = "/repos/owner/repo/contents/src/content/posts/a.md";

    fn contents(server: &MockServer) -> GitHubContents {
        let repository = RepositoryConfig {
            owner: "owner".to_string(),
            name: "repo".to_string(),
            api_base: server.uri(),
            ..Default::default()
        };
        GitHubContents::new(reqwest::Client::new(), &repository)
    }

    #[tokio::test]
    async fn test_get_file_reads_sha() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .and(query_param("ref", "main"))
            .and(header("authorization", "Bearer tok"))
            .and(header("accept", GITHUB_ACCEPT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "path": "src/content/posts/a.md",
                "sha": "abc123",
                "type": "file"
            })))
            .mount(&server)
            .await;

        let file = contents(&server)
            .get_file("tok", "src/content/posts/a.md")
            .await
            .unwrap();
        assert_eq!(file.sha.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_get_file_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
            )
            .mount(&server)
            .await;

        let err = contents(&server)
            .get_file("tok", "src/content/posts/a.md")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not Found");
    }

    #[tokio::test]
    async fn test_get_directory_has_no_sha() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "sha": "x" }])))
            .mount(&server)
            .await;

        let err = contents(&server)
            .get_file("tok", "src/content/posts/a.md")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn test_put_file_sends_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(FILE_PATH))
            .and(body_json(json!({
                "message": "msg",
                "content": "aGk=",
                "branch": "main",
                "sha": "abc"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": { "path": "src/content/posts/a.md", "sha": "def" }
            })))
            .mount(&server)
            .await;

        let request = PutFileRequest {
            message: "msg".to_string(),
            content: "aGk=".to_string(),
            branch: "main".to_string(),
            sha: Some("abc".to_string()),
        };
        let response = contents(&server)
            .put_file("tok", "src/content/posts/a.md", &request)
            .await
            .unwrap();
        assert_eq!(
            response.content.and_then(|c| c.sha).as_deref(),
            Some("def")
        );
    }

    #[tokio::test]
    async fn test_put_file_rejection_passes_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(FILE_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": "src/content/posts/a.md does not match abc"
            })))
            .mount(&server)
            .await;

        let request = PutFileRequest {
            message: "msg".to_string(),
            content: String::new(),
            branch: "main".to_string(),
            sha: Some("abc".to_string()),
        };
        let err = contents(&server)
            .put_file("tok", "src/content/posts/a.md", &request)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            UpstreamError::Rejected {
                status: 409,
                message: "src/content/posts/a.md does not match abc".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rejection_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let request = PutFileRequest {
            message: "m".to_string(),
            content: String::new(),
            branch: "main".to_string(),
            sha: None,
        };
        let err = contents(&server)
            .put_file("tok", "src/content/posts/a.md", &request)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            UpstreamError::Rejected {
                status: 502,
                message: "Bad Gateway".to_string()
            }
        );
    }

    #[test]
    fn test_put_request_omits_missing_sha() {
        let request = PutFileRequest {
            message: "m".to_string(),
            content: "c".to_string(),
            branch: "main".to_string(),
            sha: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("sha").is_none());
    }

    #[test]
    fn test_file_url_encodes_segments() {
        let repository = RepositoryConfig {
            api_base: "https://api.github.com/".to_string(),
            ..Default::default()
        };
        let contents = GitHubContents::new(reqwest::Client::new(), &repository);
        assert_eq!(
            contents.file_url("src/content/posts/中.md"),
            "https://api.github.com/repos/vega-create/vega-note/contents/src/content/posts/%E4%B8%AD.md"
        );
    }
}
