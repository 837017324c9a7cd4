//! JSON output types for machine-readable CLI output.
//!
//! Each command's `--json` flag prints one of the records below. Error codes
//! are passed through from the score and engine crates.

use serde::{Deserialize, Serialize};
use tonescore_score::{CodedError, EnvelopeSpec, ScoreError};

use super::inspect::NoteRow;

/// Warning codes for CLI operations.
pub mod warning_codes {
    /// A note ends after the configured score length
    pub const PAST_SCORE_END: &str = "CLI_W001";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "SCORE_003", "ENGINE_007")
    pub code: String,
    /// Error category (e.g., "score", "engine")
    pub category: String,
    /// Human-readable error message
    pub message: String,
    /// 1-based score line (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl JsonError {
    /// Builds an error record from any coded error.
    pub fn from_coded(error: &dyn CodedError) -> Self {
        Self {
            code: error.code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            line: None,
        }
    }

    /// Builds an error record from a score error, keeping its line number.
    pub fn from_score_error(error: &ScoreError) -> Self {
        let line = match error {
            ScoreError::Parse { line, .. } => Some(*line),
            _ => None,
        };
        Self {
            line,
            ..Self::from_coded(error)
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "CLI_W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Index of the note concerned (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<usize>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            note: None,
        }
    }

    /// Sets the note index for this warning.
    pub fn with_note(mut self, index: usize) -> Self {
        self.note = Some(index);
        self
    }
}

/// JSON output for the `render` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    pub success: bool,
    /// WAV file written
    pub output: String,
    /// Score copy written with `--save-score`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_copy: Option<String>,
    pub notes: usize,
    pub sample_rate: u32,
    pub num_samples: usize,
    pub duration_seconds: f64,
    /// BLAKE3 hash of the PCM payload
    pub pcm_hash: String,
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    /// Whether the score parsed and fits the render limits
    pub success: bool,
    pub score: String,
    /// Number of notes (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<usize>,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
}

impl ValidateOutput {
    /// Creates a successful validate output.
    pub fn success(score: impl Into<String>, notes: usize, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            score: score.into(),
            notes: Some(notes),
            errors: Vec::new(),
            warnings,
        }
    }

    /// Creates a failed validate output.
    pub fn failure(
        score: impl Into<String>,
        errors: Vec<JsonError>,
        warnings: Vec<JsonWarning>,
    ) -> Self {
        Self {
            success: false,
            score: score.into(),
            notes: None,
            errors,
            warnings,
        }
    }
}

/// JSON output for the `inspect` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectOutput {
    pub score: String,
    pub tempo: u32,
    pub notes: Vec<NoteRow>,
}

/// Sample counts of the timed envelope segments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentSamples {
    pub attack: usize,
    pub decay: usize,
    pub release: usize,
}

/// One corner of the envelope outline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutlinePoint {
    pub time_ms: f64,
    pub gain: f64,
}

/// JSON output for the `envelope` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeOutput {
    pub envelope: EnvelopeSpec,
    pub sample_rate: u32,
    pub segment_samples: SegmentSamples,
    pub outline: Vec<OutlinePoint>,
}
