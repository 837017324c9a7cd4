//! Pitch classes, octaves and frequency lookup.
//!
//! Frequencies come from a first-octave table; each octave above doubles the
//! frequency, so `C2 = 2 * C1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};

/// Lowest octave accepted in pitch names.
pub const MIN_OCTAVE: u8 = 0;

/// Highest octave accepted in pitch names (single digit).
pub const MAX_OCTAVE: u8 = 9;

/// First-octave frequencies in Hz, indexed by chromatic position (C = 0).
pub const OCTAVE1_FREQUENCIES: [f64; 12] = [
    32.70, 34.65, 36.71, 38.89, 41.20, 43.65, 46.25, 49.00, 51.91, 55.00, 58.27, 61.74,
];

/// One of the twelve equal-tempered pitch classes (flat spelling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Gb,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Chromatic index (C = 0, B = 11).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class at a chromatic index, wrapping modulo 12.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Canonical (flat) spelling.
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }

    /// Frequency of this class in the first octave.
    pub fn base_frequency(self) -> f64 {
        OCTAVE1_FREQUENCIES[self.index()]
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = ScoreError;

    /// Parses a letter with an optional accidental.
    ///
    /// Flats use `b` (`Eb`), sharps use `#` and map onto the flat spelling
    /// (`D#` -> `Eb`). Spellings that fall outside the table (`Cb`, `E#`, ...)
    /// are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| ScoreError::invalid_pitch(s, "empty pitch class"))?
            .to_ascii_uppercase();
        let accidental = chars.next();
        if chars.next().is_some() {
            return Err(ScoreError::invalid_pitch(s, "unknown pitch class"));
        }

        let natural = match letter {
            'C' => PitchClass::C,
            'D' => PitchClass::D,
            'E' => PitchClass::E,
            'F' => PitchClass::F,
            'G' => PitchClass::G,
            'A' => PitchClass::A,
            'B' => PitchClass::B,
            _ => return Err(ScoreError::invalid_pitch(s, "unknown pitch class")),
        };

        match accidental {
            None => Ok(natural),
            Some('b') => match natural {
                PitchClass::C | PitchClass::F => {
                    Err(ScoreError::invalid_pitch(s, "flat spelling not in table"))
                }
                other => Ok(PitchClass::from_index(other.index() + 11)),
            },
            Some('#') => match natural {
                PitchClass::E | PitchClass::B => {
                    Err(ScoreError::invalid_pitch(s, "sharp spelling not in table"))
                }
                other => Ok(PitchClass::from_index(other.index() + 1)),
            },
            Some(_) => Err(ScoreError::invalid_pitch(s, "unknown accidental")),
        }
    }
}

/// A pitch class in a specific octave, e.g. `A4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    class: PitchClass,
    octave: u8,
}

impl Pitch {
    /// Creates a pitch, rejecting octaves outside `MIN_OCTAVE..=MAX_OCTAVE`.
    pub fn new(class: PitchClass, octave: u8) -> ScoreResult<Self> {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return Err(ScoreError::invalid_pitch(
                format!("{}{}", class, octave),
                format!("octave must be {}-{}", MIN_OCTAVE, MAX_OCTAVE),
            ));
        }
        Ok(Self { class, octave })
    }

    pub fn class(&self) -> PitchClass {
        self.class
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Frequency in Hz: `base(class) * 2^(octave - 1)`.
    pub fn frequency(&self) -> f64 {
        self.class.base_frequency() * 2.0_f64.powi(self.octave as i32 - 1)
    }

    /// Returns the pitch moved by `half_steps` semitones.
    ///
    /// The chromatic index uses Euclidean modulo and the octave carries when
    /// the index wraps, so `B4 + 1 = C5` and `C4 - 1 = B3`.
    ///
    /// # Errors
    /// `InvalidPitch` when the result leaves the supported octave range.
    pub fn shift(&self, half_steps: i32) -> ScoreResult<Self> {
        let total = self.class.index() as i64 + half_steps as i64;
        let octave = self.octave as i64 + total.div_euclid(12);
        let class = PitchClass::from_index(total.rem_euclid(12) as usize);

        if octave < MIN_OCTAVE as i64 || octave > MAX_OCTAVE as i64 {
            return Err(ScoreError::invalid_pitch(
                format!("{}{}", class, octave),
                format!(
                    "shifting {} by {} half steps leaves octaves {}-{}",
                    self, half_steps, MIN_OCTAVE, MAX_OCTAVE
                ),
            ));
        }

        Ok(Self {
            class,
            octave: octave as u8,
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = ScoreError;

    /// Parses `<class><octave digit>`, e.g. `C4`, `Bb3`, `F#5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let octave_char = s
            .chars()
            .last()
            .ok_or_else(|| ScoreError::invalid_pitch(s, "empty pitch"))?;
        let octave = octave_char
            .to_digit(10)
            .ok_or_else(|| ScoreError::invalid_pitch(s, "octave must be a single digit"))?;

        let class_part = &s[..s.len() - octave_char.len_utf8()];
        let class = class_part
            .parse::<PitchClass>()
            .map_err(|_| ScoreError::invalid_pitch(s, "unknown pitch class"))?;

        Pitch::new(class, octave as u8)
    }
}
