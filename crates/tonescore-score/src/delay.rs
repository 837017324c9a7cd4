//! Delay effect parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};

/// Upper bound on delay repetitions; larger counts are capped.
pub const MAX_DELAY_REPETITIONS: u32 = 10;

/// Settings for the multi-tap decaying delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayParams {
    /// Spacing between repetitions in milliseconds.
    pub delay_time_ms: f64,
    /// Number of delayed copies (capped at [`MAX_DELAY_REPETITIONS`]).
    pub repetitions: u32,
    /// Wet/dry blend: 0.0 keeps only the input, 1.0 only the echoes.
    pub mix: f64,
    /// Attenuation reached by the last repetition (0.0 to 1.0).
    pub decay: f64,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            delay_time_ms: 100.0,
            repetitions: 5,
            mix: 0.5,
            decay: 0.5,
        }
    }
}

impl DelayParams {
    /// Creates validated delay parameters.
    pub fn new(delay_time_ms: f64, repetitions: u32, mix: f64, decay: f64) -> ScoreResult<Self> {
        let params = Self {
            delay_time_ms,
            repetitions,
            mix,
            decay,
        };
        params.validate()?;
        Ok(params)
    }

    /// Repetition count after capping.
    pub fn effective_repetitions(&self) -> u32 {
        self.repetitions.min(MAX_DELAY_REPETITIONS)
    }

    pub fn validate(&self) -> ScoreResult<()> {
        if !self.delay_time_ms.is_finite() || self.delay_time_ms <= 0.0 {
            return Err(ScoreError::invalid_param(
                "delay_time_ms",
                format!("must be positive, got {}", self.delay_time_ms),
            ));
        }

        if !(0.0..=1.0).contains(&self.mix) {
            return Err(ScoreError::invalid_param(
                "mix",
                format!("must be in [0.0, 1.0], got {}", self.mix),
            ));
        }

        if !(0.0..=1.0).contains(&self.decay) {
            return Err(ScoreError::invalid_param(
                "decay",
                format!("must be in [0.0, 1.0], got {}", self.decay),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = DelayParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.effective_repetitions(), 5);
    }

    #[test]
    fn test_repetitions_capped() {
        let params = DelayParams::new(50.0, 40, 0.5, 0.5).unwrap();
        assert_eq!(params.repetitions, 40);
        assert_eq!(params.effective_repetitions(), MAX_DELAY_REPETITIONS);
    }

    #[test]
    fn test_validation() {
        assert!(DelayParams::new(0.0, 1, 0.5, 0.5).is_err());
        assert!(DelayParams::new(-10.0, 1, 0.5, 0.5).is_err());
        assert!(DelayParams::new(10.0, 1, 1.1, 0.5).is_err());
        assert!(DelayParams::new(10.0, 1, 0.5, -0.1).is_err());
        assert!(DelayParams::new(10.0, 0, 0.0, 1.0).is_ok());
    }
}
