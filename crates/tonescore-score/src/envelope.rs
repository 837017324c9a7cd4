//! ADSR envelope parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};

/// Attack/decay/sustain/release settings shared by every note of a score.
///
/// Times are in milliseconds; `sustain` is a gain level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeSpec {
    /// Ramp from 0 to full gain.
    pub attack_ms: f64,
    /// Ramp from full gain down to the sustain level.
    pub decay_ms: f64,
    /// Level held until the note ends (0.0 to 1.0).
    pub sustain: f64,
    /// Ramp from the sustain level to 0 after the note ends.
    pub release_ms: f64,
}

impl Default for EnvelopeSpec {
    fn default() -> Self {
        Self {
            attack_ms: 200.0,
            decay_ms: 50.0,
            sustain: 0.5,
            release_ms: 200.0,
        }
    }
}

impl EnvelopeSpec {
    /// Creates a validated envelope.
    pub fn new(attack_ms: f64, decay_ms: f64, sustain: f64, release_ms: f64) -> ScoreResult<Self> {
        let spec = Self {
            attack_ms,
            decay_ms,
            sustain,
            release_ms,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that every time is finite and non-negative and sustain is in [0, 1].
    pub fn validate(&self) -> ScoreResult<()> {
        for (name, value) in [
            ("attack_ms", self.attack_ms),
            ("decay_ms", self.decay_ms),
            ("release_ms", self.release_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoreError::invalid_param(
                    name,
                    format!("must be a finite, non-negative time, got {}", value),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.sustain) {
            return Err(ScoreError::invalid_param(
                "sustain",
                format!("must be in [0.0, 1.0], got {}", self.sustain),
            ));
        }

        Ok(())
    }

    /// Breakpoints `(time_ms, gain)` of the envelope shape for display.
    ///
    /// The sustain plateau is drawn as long as attack plus decay.
    pub fn outline(&self) -> [(f64, f64); 5] {
        let attack_end = self.attack_ms;
        let decay_end = attack_end + self.decay_ms;
        let sustain_end = decay_end + self.attack_ms + self.decay_ms;
        let release_end = sustain_end + self.release_ms;

        [
            (0.0, 0.0),
            (attack_end, 1.0),
            (decay_end, self.sustain),
            (sustain_end, self.sustain),
            (release_end, 0.0),
        ]
    }
}
