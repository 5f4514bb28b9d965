//! Error taxonomy for the content layer and its HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    /// Missing or invalid process configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A slug lookup matched nothing.
    #[error("{kind} with slug \"{slug}\" not found")]
    NotFound { kind: &'static str, slug: String },

    /// The store was unreachable, answered with an error status, or sent a
    /// body that does not match the content model.
    #[error("content store query failed: {message}")]
    RemoteQuery {
        message: String,
        status: Option<u16>,
    },

    /// Binding or serving the HTTP listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub fn not_found(kind: &'static str, slug: impl Into<String>) -> Self {
        ContentError::NotFound {
            kind,
            slug: slug.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        ContentError::RemoteQuery {
            message: message.into(),
            status: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ContentError::Config(_) | ContentError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ContentError::NotFound { .. } => StatusCode::NOT_FOUND,
            ContentError::RemoteQuery { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(e: reqwest::Error) -> Self {
        ContentError::RemoteQuery {
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// Error body shared by every JSON route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ContentError::NotFound { .. } => ErrorResponse {
                error: "Not found".to_string(),
                message: Some(self.to_string()),
            },
            ContentError::RemoteQuery { .. } => {
                tracing::error!(error = %self, "content store request failed");
                ErrorResponse {
                    error: "Content store unavailable".to_string(),
                    message: None,
                }
            }
            ContentError::Config(_) | ContentError::Io(_) => {
                tracing::error!(error = %self, "internal error while serving request");
                ErrorResponse {
                    error: "Server misconfigured".to_string(),
                    message: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
