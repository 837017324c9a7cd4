//! Engine and session configuration.
//!
//! [`EngineConfig`] fixes the rendering grid (sample rate, score length, seed)
//! and is threaded through every component that produces samples.
//! [`SessionConfig`] adds the musical settings a user picks for one render and
//! can be loaded from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tonescore_score::{DelayParams, EnvelopeSpec};

use crate::error::{EngineError, EngineResult};

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 11250;

/// Default score length: 16 whole notes.
pub const DEFAULT_TOTAL_EIGHTH_NOTES: u32 = 128;

/// Default tempo.
pub const DEFAULT_TEMPO: u32 = 100;

/// Longest buffer a render may produce, in samples.
///
/// About 99 minutes at the default sample rate, and 128 MiB of 16-bit PCM.
pub const MAX_RENDER_SAMPLES: usize = 1 << 26;

/// Fixed parameters of the rendering grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples per second for every buffer.
    pub sample_rate: u32,
    /// Score length in eighth-note units.
    pub total_eighth_notes: u32,
    /// Base seed for noise generation.
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            total_eighth_notes: DEFAULT_TOTAL_EIGHTH_NOTES,
            seed: 0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        Ok(())
    }

    /// Number of samples covering `ms` milliseconds, rounded down.
    pub fn ms_to_samples(&self, ms: f64) -> usize {
        ms_to_samples(ms, self.sample_rate)
    }

    /// Sample index of grid position `eighths` at `tempo`.
    ///
    /// Positions are rounded to the nearest sample so notes that touch on the
    /// grid also touch in the rendered audio.
    pub fn grid_to_samples(&self, eighths: u32, tempo: u32) -> usize {
        let seconds = eighths as f64 * eighth_note_seconds(tempo);
        (seconds * self.sample_rate as f64).round() as usize
    }

    /// Length of the whole score in samples at `tempo`.
    pub fn score_samples(&self, tempo: u32) -> usize {
        self.grid_to_samples(self.total_eighth_notes, tempo)
    }

    /// Like [`grid_to_samples`](Self::grid_to_samples), but fails when the
    /// position lies beyond [`MAX_RENDER_SAMPLES`].
    pub fn checked_grid_to_samples(&self, eighths: u32, tempo: u32) -> EngineResult<usize> {
        let samples = self.grid_to_samples(eighths, tempo);
        if samples > MAX_RENDER_SAMPLES {
            return Err(EngineError::invalid_param(
                "position",
                format!(
                    "eighth note {} at tempo {} is past the render limit of {} samples",
                    eighths, tempo, MAX_RENDER_SAMPLES
                ),
            ));
        }
        Ok(samples)
    }

    /// Checked length of the whole score in samples at `tempo`.
    pub fn checked_score_samples(&self, tempo: u32) -> EngineResult<usize> {
        self.checked_grid_to_samples(self.total_eighth_notes, tempo)
    }
}

/// Duration of one eighth note in seconds: `30 / tempo`.
pub fn eighth_note_seconds(tempo: u32) -> f64 {
    30.0 / tempo as f64
}

/// Number of samples covering `ms` milliseconds at `sample_rate`, rounded down.
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> usize {
    if !ms.is_finite() || ms <= 0.0 {
        return 0;
    }
    (ms * sample_rate as f64 / 1000.0).floor() as usize
}

/// Checks that `tempo` can drive a render.
pub fn validate_tempo(tempo: u32) -> EngineResult<()> {
    if tempo == 0 {
        return Err(EngineError::InvalidTempo { tempo });
    }
    Ok(())
}

/// Settings for one render session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tempo: u32,
    /// Shape every note with `envelope`.
    pub apply_envelope: bool,
    pub envelope: EnvelopeSpec,
    /// Delay applied to the final mix, if any.
    pub delay: Option<DelayParams>,
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            apply_envelope: true,
            envelope: EnvelopeSpec::default(),
            delay: None,
            engine: EngineConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parses a session from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let session: SessionConfig = serde_json::from_str(json)
            .map_err(|e| EngineError::invalid_param("session", e.to_string()))?;
        session.validate()?;
        Ok(session)
    }

    /// Loads and validates a session file.
    pub fn from_json_file(path: &Path) -> EngineResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::invalid_param("session", e.to_string()))
    }

    pub fn validate(&self) -> EngineResult<()> {
        validate_tempo(self.tempo)?;
        self.engine.validate()?;
        self.envelope.validate()?;
        if let Some(delay) = &self.delay {
            delay.validate()?;
        }
        Ok(())
    }
}
