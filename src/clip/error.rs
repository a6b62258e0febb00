//! Failure taxonomy for clip extraction.

use axum::http::StatusCode;
use std::fmt;

/// Message returned when required request fields are missing or malformed.
pub const REQUIRED_FIELDS_MESSAGE: &str = "URL, startTime, and endTime are required";

/// Why an extraction job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caller error; nothing was spawned or written.
    InvalidRequest,
    /// yt-dlp failed the pre-flight check; nothing was written.
    ToolUnavailable,
    /// yt-dlp could not start, reported failure, or was killed after the job timeout.
    ToolExecutionFailed,
    /// yt-dlp exited cleanly but the expected output file is absent.
    OutputMissing,
    /// Anything else, e.g. I/O failure reading the produced file.
    InternalError,
}

impl FailureKind {
    /// HTTP status reported to the caller for this kind.
    pub fn status_code(self) -> StatusCode {
        match self {
            FailureKind::InvalidRequest => StatusCode::BAD_REQUEST,
            FailureKind::ToolUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            FailureKind::ToolExecutionFailed
            | FailureKind::OutputMissing
            | FailureKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidRequest => "invalid request",
            FailureKind::ToolUnavailable => "tool unavailable",
            FailureKind::ToolExecutionFailed => "tool execution failed",
            FailureKind::OutputMissing => "output missing",
            FailureKind::InternalError => "internal error",
        };
        f.write_str(name)
    }
}

/// A failed extraction: the kind, a human-readable message, and optional
/// lower-level diagnostics (tool stderr, I/O error text) for operators.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClipError {
    pub kind: FailureKind,
    pub message: String,
    pub details: Option<String>,
}

impl ClipError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Attach diagnostic details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidRequest, message)
    }

    pub fn tool_unavailable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ToolUnavailable, message)
    }

    pub fn tool_failed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ToolExecutionFailed, message)
    }

    pub fn output_missing(message: impl Into<String>) -> Self {
        Self::new(FailureKind::OutputMissing, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InternalError, message)
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FailureKind::InvalidRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            FailureKind::ToolUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            FailureKind::ToolExecutionFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            FailureKind::OutputMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            FailureKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_and_details() {
        let err = ClipError::tool_failed("Failed to download and clip video")
            .with_details("yt-dlp exited with code 1");
        assert_eq!(
            err.to_string(),
            "tool execution failed: Failed to download and clip video"
        );
        assert_eq!(err.details.as_deref(), Some("yt-dlp exited with code 1"));
    }
}
