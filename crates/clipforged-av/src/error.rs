//! Error types for clipforged-av.

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving an external tool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available at the configured path.
    #[error("tool not found: {}", path.display())]
    ToolNotFound { path: PathBuf },

    /// The tool could not be started at all (missing binary, permission denied).
    #[error("failed to start {tool}: {message}")]
    ToolLaunch { tool: String, message: String },

    /// The tool ran and exited with a non-zero status.
    #[error("{tool} exited with code {}. Error: {stderr}", code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The tool exceeded its allotted wall-clock time and was killed.
    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// A timestamp did not match the `HH:MM:SS.mmm` grammar.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ToolNotFound { path: path.into() }
    }

    /// Create a launch failure error.
    pub fn tool_launch(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolLaunch {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
