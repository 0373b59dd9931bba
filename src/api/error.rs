use thiserror::Error;

/// Coarse cause of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request never produced a response.
    Network,
    /// The service answered with a non-2xx status.
    Server,
    /// The body did not match the expected shape.
    Malformed,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response body from {url}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ApiError::HttpStatus { .. } => FailureKind::Server,
            ApiError::MalformedResponse { .. } => FailureKind::Malformed,
            ApiError::InvalidBaseUrl(_)
            | ApiError::ClientBuild(_)
            | ApiError::NetworkRequest(..) => FailureKind::Network,
        }
    }
}
