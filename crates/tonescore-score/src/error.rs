//! Error types for score parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for score operations.
pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors with a stable, machine-readable code.
///
/// Implemented by every error type in the workspace so the CLI can report
/// failures uniformly.
pub trait CodedError: std::error::Error {
    /// Returns the stable error code (e.g., "SCORE_001").
    fn code(&self) -> &'static str;

    /// Returns the error category (e.g., "score").
    fn category(&self) -> &'static str;
}

/// Errors that can occur while building, parsing or storing scores.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Unknown pitch class or unusable octave.
    #[error("invalid pitch '{name}': {message}")]
    InvalidPitch {
        /// The offending pitch text.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// A numeric field is out of range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A score line does not follow the fixed-field format.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the score text.
        line: usize,
        /// Error message.
        message: String,
    },

    /// Reading or writing a score file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ScoreError {
    /// Creates an invalid pitch error.
    pub fn invalid_pitch(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPitch {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Creates an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl CodedError for ScoreError {
    fn code(&self) -> &'static str {
        match self {
            ScoreError::InvalidPitch { .. } => "SCORE_001",
            ScoreError::InvalidParameter { .. } => "SCORE_002",
            ScoreError::Parse { .. } => "SCORE_003",
            ScoreError::Io { .. } => "SCORE_004",
        }
    }

    fn category(&self) -> &'static str {
        "score"
    }
}
