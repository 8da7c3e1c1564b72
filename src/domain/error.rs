use std::path::PathBuf;

use thiserror::Error;

use super::model::{Phase, StreamKind};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("Please select a folder to save the video.")]
    MissingDestination,

    #[error("Invalid YouTube URL.")]
    InvalidUrl,

    #[error("Failed to fetch video: {0}")]
    FetchFailed(String),

    #[error("Failed to download video ({phase}): {message}")]
    OperationFailed { phase: Phase, message: String },
}

impl AppError {
    /// True for failures detected before any network I/O
    pub fn is_precondition(&self) -> bool {
        matches!(self, AppError::MissingDestination | AppError::InvalidUrl)
    }
}

/// Problems that do not abort a download but should still reach the user
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DownloadWarning {
    #[error("No {0} stream is available for this video; it was skipped")]
    StreamUnavailable(StreamKind),

    #[error("Could not remove intermediate file {}: {message}", .path.display())]
    CleanupFailed { path: PathBuf, message: String },
}
