//! Error types for fetchmux

use thiserror::Error;

/// Main error type for fetchmux operations
#[derive(Debug, Error)]
pub enum FetchmuxError {
    #[error("No source URL or file path supplied")]
    InputMissing,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Source file not found: {0}")]
    SourceFileMissing(String),

    #[error("No suitable format found")]
    NoFormatFound,

    #[error("Item fetch failed: {0}")]
    ItemFetchFailure(String),

    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("{tool} exited with an error: {message}")]
    Collaborator { tool: String, message: String },

    #[error("{tool} not found in PATH: {source}")]
    CollaboratorMissing {
        tool: String,
        source: std::io::Error,
    },

    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl FetchmuxError {
    /// Check if error is fatal for a whole batch (as opposed to one item)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchmuxError::InputMissing
                | FetchmuxError::InvalidUrl(_)
                | FetchmuxError::SourceFileMissing(_)
                | FetchmuxError::CollaboratorMissing { .. }
                | FetchmuxError::ProbeFailed(_)
        )
    }

    /// Check if error came from an external tool invocation
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            FetchmuxError::Collaborator { .. }
                | FetchmuxError::CollaboratorMissing { .. }
                | FetchmuxError::Timeout { .. }
        )
    }
}
