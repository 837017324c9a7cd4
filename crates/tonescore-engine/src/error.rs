//! Error types for the synthesis engine.

use std::path::PathBuf;

use thiserror::Error;
use tonescore_score::{CodedError, ScoreError};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while generating, combining or rendering audio.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A score-level value (pitch, note, envelope, delay) is invalid.
    #[error(transparent)]
    Score(#[from] ScoreError),

    /// Two buffers with different sample rates were combined.
    #[error("sample rate mismatch: {left} Hz vs {right} Hz")]
    SampleRateMismatch {
        /// Sample rate of the receiving buffer.
        left: u32,
        /// Sample rate of the other operand.
        right: u32,
    },

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid frequency.
    #[error("invalid frequency: {freq} Hz")]
    InvalidFrequency {
        /// The invalid frequency.
        freq: f64,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Tempo must be a positive integer.
    #[error("invalid tempo: {tempo}")]
    InvalidTempo {
        /// The invalid tempo.
        tempo: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
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

impl CodedError for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::Score(inner) => inner.code(),
            EngineError::SampleRateMismatch { .. } => "ENGINE_001",
            EngineError::InvalidSampleRate { .. } => "ENGINE_002",
            EngineError::InvalidFrequency { .. } => "ENGINE_003",
            EngineError::InvalidDuration { .. } => "ENGINE_004",
            EngineError::InvalidTempo { .. } => "ENGINE_005",
            EngineError::InvalidParameter { .. } => "ENGINE_006",
            EngineError::Io { .. } => "ENGINE_007",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            EngineError::Score(inner) => inner.category(),
            _ => "engine",
        }
    }
}
