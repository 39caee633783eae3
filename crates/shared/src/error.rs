use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Io,
    Decode,
    Fetch,
    NotFound,
    Index,
}

impl ErrorCode {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCode::Io => "File access",
            ErrorCode::Decode => "Malformed data",
            ErrorCode::Fetch => "Network",
            ErrorCode::NotFound => "Not found",
            ErrorCode::Index => "Invalid position",
        }
    }
}

/// A classified, display-ready error. Crate-specific errors are flattened
/// into this before they cross into the session state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

pub trait ClassifiedError: std::error::Error {
    fn code(&self) -> ErrorCode;

    fn report(&self) -> ErrorReport {
        ErrorReport::new(self.code(), self.to_string())
    }
}
