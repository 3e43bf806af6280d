//! Edge error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for edge operations.
pub type EdgeResult<T> = Result<T, EdgeError>;

/// Errors the edge can surface to a client.
///
/// Gate outcomes are never errors; everything here comes from request
/// plumbing or the upstream origin.
#[derive(Debug, Error)]
pub enum EdgeError {
    // 400 Bad Request
    #[error("Bad request: {0}")]
    BadRequest(String),

    // 502 Bad Gateway
    #[error("Upstream error: {0}")]
    Upstream(String),

    // 504 Gateway Timeout
    #[error("Upstream timed out")]
    UpstreamTimeout,

    // 500 Internal Server Error
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl EdgeError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Upstream(_) => "upstream_error",
            Self::UpstreamTimeout => "upstream_timeout",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<reqwest::Error> for EdgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EdgeError::UpstreamTimeout
        } else {
            EdgeError::Upstream(err.to_string())
        }
    }
}

impl From<anyhow::Error> for EdgeError {
    fn from(err: anyhow::Error) -> Self {
        EdgeError::Internal(err)
    }
}
