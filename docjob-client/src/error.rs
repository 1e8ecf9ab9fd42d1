//! Errors raised while talking to the document service or object store

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of a single call to one of the remote services
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, broken body
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Service answered with a non-success status other than 404
    #[error("service returned {status}: {message}")]
    ApiError {
        status: u16,
        /// Response body, or the status reason when the body is empty
        message: String,
    },

    /// Body did not match the expected job or object shape
    #[error("unexpected response body: {0}")]
    ParseError(String),

    /// Job id or object path unknown to the service
    #[error("{0} does not exist")]
    NotFound(String),

    /// Rejected locally before anything was sent
    #[error("cannot build request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// True for a missing job or object, however the service reported it
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// 4xx status: retrying the same call will not help
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// 5xx status: the service itself is unhealthy
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
