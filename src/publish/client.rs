//! Caller side of the publish endpoint

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use super::{PublishReceipt, PublishRequest, WRITER_KEY_HEADER};
use crate::categories::Storage;
use crate::content::EditorSession;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("a publish is already in progress")]
    InFlight,

    #[error("Please enter a title before publishing")]
    MissingTitle,

    /// The endpoint answered with an error
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Clears the publishing flag when dropped
struct PublishGuard(Arc<AtomicBool>);

impl PublishGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for PublishGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends drafts to a publish endpoint, one at a time
#[derive(Debug, Clone)]
pub struct PublishClient {
    http: reqwest::Client,
    endpoint: String,
    writer_key: String,
    publishing: Arc<AtomicBool>,
}

impl PublishClient {
    pub fn new(endpoint: impl Into<String>, writer_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, writer_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        writer_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            writer_key: writer_key.into(),
            publishing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a publish is outstanding
    pub fn is_publishing(&self) -> bool {
        self.publishing.load(Ordering::Acquire)
    }

    /// Send one publish request
    ///
    /// Fails with [`ClientError::InFlight`] while another call on this client
    /// (or a clone of it) has not finished.
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, ClientError> {
        let _guard = PublishGuard::acquire(&self.publishing).ok_or(ClientError::InFlight)?;

        tracing::info!("Publishing {} to {}", request.filename, self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .header(WRITER_KEY_HEADER, &self.writer_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| {
                    if text.trim().is_empty() {
                        status.to_string()
                    } else {
                        text
                    }
                });
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<PublishReceipt>()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }

    /// Publish the session's draft and record the outcome as its notice
    ///
    /// A draft without a title is refused before anything is sent and leaves
    /// the notice untouched.
    pub async fn publish_session<S: Storage>(
        &self,
        session: &mut EditorSession<S>,
        publish_date: NaiveDate,
    ) -> Result<PublishReceipt, ClientError> {
        let request = session.publish_request(publish_date)?;
        session.dismiss_notice();

        let outcome = self.publish(&request).await;
        session.record_publish(&outcome);
        outcome
    }
}
