//! Errors returned by the CUZK API client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuzkError {
    /// The caller's cancellation token fired while waiting or in flight.
    #[error("request cancelled")]
    Cancelled,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid rate limit: {0}")]
    InvalidRateLimit(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request could not be built; never retried.
    #[error("create request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("attempt {attempt}/{max_attempts}: {source}")]
    Transport {
        attempt: u32,
        max_attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("read body (attempt {attempt}/{max_attempts}): {source}")]
    BodyRead {
        attempt: u32,
        max_attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} (attempt {attempt}/{max_attempts})")]
    RetryableStatus {
        status: u16,
        attempt: u32,
        max_attempts: u32,
    },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("json decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("max retries exceeded after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<CuzkError>,
    },

    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<CuzkError>,
    },
}

impl CuzkError {
    /// Wraps the error with the name of the API operation that produced it.
    pub fn context(self, operation: &'static str) -> Self {
        CuzkError::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// Whether this error came from cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        match self {
            CuzkError::Cancelled => true,
            CuzkError::Operation { source, .. } | CuzkError::RetriesExhausted { source, .. } => {
                source.is_cancelled()
            }
            _ => false,
        }
    }

    /// Whether another attempt may succeed (transport, body read, 5xx, 429).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CuzkError::Transport { .. }
                | CuzkError::BodyRead { .. }
                | CuzkError::RetryableStatus { .. }
        )
    }

    /// HTTP status of the upstream response, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CuzkError::Status { status, .. } | CuzkError::RetryableStatus { status, .. } => {
                Some(*status)
            }
            CuzkError::Operation { source, .. } | CuzkError::RetriesExhausted { source, .. } => {
                source.status()
            }
            _ => None,
        }
    }
}
