//! Error types for the backend client

use thiserror::Error;

/// Errors that can occur when talking to the forecasting backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, reset
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Configured backend URL is unusable
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Whether the backend was reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }
}
