//! Error types for history extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised while reading or scanning a log stream.
///
/// Every variant carries enough context to locate the failure so a run can be
/// repeated against a corrected log or repository.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// `line` is the 1-based line number of the block's start sentinel.
    #[error("Malformed commit block starting at line {line}: {reason}")]
    MalformedBlock { line: usize, reason: String },

    #[error("Git is not available on this system")]
    GitNotAvailable,

    #[error("Path is not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// `stderr` is the tool's own output, unmodified.
    #[error("git log exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Failed to read log file {}: {source}", path.display())]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ExtractError::MalformedBlock { line, reason: reason.into() }
    }
}
