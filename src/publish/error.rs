//! Errors surfaced by the publish endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use super::github::UpstreamError;
use crate::config::GITHUB_TOKEN_VAR;

/// Message returned when filename or content is missing
pub const MISSING_FIELDS: &str = "Missing filename or content";

/// Failure modes of a publish request
///
/// Each variant maps to one HTTP status. The display string is the `error`
/// field of the JSON response body.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The server has no credential for the repository host
    #[error("{0}")]
    Configuration(String),

    /// The caller did not present the writer key
    #[error("Unauthorized")]
    Authentication,

    /// The request is missing or carries unusable fields
    #[error("{0}")]
    Validation(String),

    /// The repository host rejected the write
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Anything else that went wrong while handling the request
    #[error("{0}")]
    Unknown(String),
}

impl PublishError {
    pub fn missing_token() -> Self {
        Self::Configuration(format!("{} not configured", GITHUB_TOKEN_VAR))
    }

    pub fn missing_fields() -> Self {
        Self::Validation(MISSING_FIELDS.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PublishError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PublishError::Authentication => StatusCode::UNAUTHORIZED,
            PublishError::Validation(_) => StatusCode::BAD_REQUEST,
            PublishError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            PublishError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for PublishError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { status, message } => {
                PublishError::Upstream { status, message }
            }
            other => PublishError::Unknown(other.to_string()),
        }
    }
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            PublishError::Configuration(_) | PublishError::Unknown(_) => {
                tracing::error!("Publish failed ({}): {}", status, self)
            }
            PublishError::Upstream { .. } => {
                tracing::warn!("Repository host rejected publish ({}): {}", status, self)
            }
            PublishError::Authentication | PublishError::Validation(_) => {
                tracing::debug!("Rejected publish request ({}): {}", status, self)
            }
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PublishError::missing_token().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PublishError::Authentication.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PublishError::missing_fields().status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PublishError::Upstream {
                status: 409,
                message: "conflict".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PublishError::Upstream {
                status: 42,
                message: "weird".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_from_upstream() {
        let err: PublishError = UpstreamError::Rejected {
            status: 422,
            message: "sha wasn't supplied".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "sha wasn't supplied");

        let err: PublishError = UpstreamError::Transport("connection reset".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            PublishError::missing_token().to_string(),
            "GITHUB_TOKEN not configured"
        );
        assert_eq!(PublishError::Authentication.to_string(), "Unauthorized");
        assert_eq!(PublishError::missing_fields().to_string(), MISSING_FIELDS);
    }
}
