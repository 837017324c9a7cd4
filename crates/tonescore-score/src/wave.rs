//! Wave kind tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// The kind of signal a buffer holds.
///
/// `Derived` marks buffers produced by combining other buffers; it can never
/// be generated directly and is rejected on notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveKind {
    Sine,
    Square,
    Sawtooth,
    Constant,
    Noise,
    Derived,
}

impl WaveKind {
    /// Kinds that the generator can produce.
    pub const GENERATED: [WaveKind; 5] = [
        WaveKind::Sine,
        WaveKind::Square,
        WaveKind::Sawtooth,
        WaveKind::Constant,
        WaveKind::Noise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WaveKind::Sine => "Sine",
            WaveKind::Square => "Square",
            WaveKind::Sawtooth => "Sawtooth",
            WaveKind::Constant => "Constant",
            WaveKind::Noise => "Noise",
            WaveKind::Derived => "Derived",
        }
    }

    /// Returns true for every kind except `Derived`.
    pub fn is_generated(self) -> bool {
        !matches!(self, WaveKind::Derived)
    }

    /// Returns true for kinds whose output depends on frequency.
    pub fn is_periodic(self) -> bool {
        matches!(self, WaveKind::Sine | WaveKind::Square | WaveKind::Sawtooth)
    }
}

impl fmt::Display for WaveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveKind {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sine" => Ok(WaveKind::Sine),
            "Square" => Ok(WaveKind::Square),
            "Sawtooth" => Ok(WaveKind::Sawtooth),
            "Constant" => Ok(WaveKind::Constant),
            "Noise" => Ok(WaveKind::Noise),
            "Derived" => Ok(WaveKind::Derived),
            other => Err(ScoreError::invalid_param(
                "wave",
                format!("unknown wave kind '{}'", other),
            )),
        }
    }
}
