//! Shared error type across statdeck crates.

use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed request or config.
    BadRequest,
    /// Event or lookup referenced a series that was never registered.
    UnknownSeries,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Renderer could not produce an image.
    RenderFailed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnknownSeries => "UNKNOWN_SERIES",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::RenderFailed => "RENDER_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum StatError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown series: {0}")]
    UnknownSeries(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("render failed: {0}")]
    RenderFailed(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl StatError {
    /// Map internal error to a stable caller-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            StatError::BadRequest(_) => ErrorCode::BadRequest,
            StatError::UnknownSeries(_) => ErrorCode::UnknownSeries,
            StatError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            StatError::RenderFailed(_) => ErrorCode::RenderFailed,
            StatError::Internal(_) => ErrorCode::Internal,
        }
    }
}
