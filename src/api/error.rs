use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure outcome of a single MyStat call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {url}: {source}. Response body (first 500 chars): {snippet}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
        snippet: String,
    },

    #[error("login endpoint returned an empty token")]
    EmptyToken,
}

impl ApiError {
    /// HTTP status of the failed call, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
