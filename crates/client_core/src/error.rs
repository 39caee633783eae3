use shared::{
    domain::TrackingNumber,
    error::{ClassifiedError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("package with number {tracking_number} not found")]
    NotFound { tracking_number: TrackingNumber },
    #[error("{url} responded with HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("invalid API base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    /// The number the service reported as unknown, if that is what failed.
    pub fn missing_tracking_number(&self) -> Option<&TrackingNumber> {
        match self {
            FetchError::NotFound { tracking_number } => Some(tracking_number),
            _ => None,
        }
    }
}

impl ClassifiedError for FetchError {
    fn code(&self) -> ErrorCode {
        match self {
            FetchError::NotFound { .. } => ErrorCode::NotFound,
            FetchError::Decode { .. } => ErrorCode::Decode,
            FetchError::Transport { .. }
            | FetchError::UnexpectedStatus { .. }
            | FetchError::InvalidBaseUrl { .. } => ErrorCode::Fetch,
        }
    }
}
