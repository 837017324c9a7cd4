//! Notes on the eighth-note grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScoreError, ScoreResult};
use crate::pitch::{Pitch, PitchClass};
use crate::wave::WaveKind;

/// Length of a whole note in eighth-note units.
pub const WHOLE_NOTE: u32 = 8;
/// Length of a half note in eighth-note units.
pub const HALF_NOTE: u32 = 4;
/// Length of a quarter note in eighth-note units.
pub const QUARTER_NOTE: u32 = 2;
/// Length of an eighth note in eighth-note units.
pub const EIGHTH_NOTE: u32 = 1;

/// A single note placed on the score grid.
///
/// Notes are immutable once built; [`Note::pitch_shift`] returns a new note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pitch: Pitch,
    velocity: f64,
    start: u32,
    length: u32,
    wave: WaveKind,
}

impl Note {
    /// Creates a note.
    ///
    /// Velocity is clamped to [-1, 1] and its absolute value kept, so `-0.5`
    /// is stored as `0.5`.
    ///
    /// # Errors
    /// `InvalidParameter` for a NaN velocity, a zero length or a `Derived`
    /// wave kind.
    pub fn new(
        pitch: Pitch,
        velocity: f64,
        start: u32,
        length: u32,
        wave: WaveKind,
    ) -> ScoreResult<Self> {
        if velocity.is_nan() {
            return Err(ScoreError::invalid_param("velocity", "must be a number"));
        }
        if length == 0 {
            return Err(ScoreError::invalid_param(
                "length",
                "must be at least one eighth note",
            ));
        }
        if !wave.is_generated() {
            return Err(ScoreError::invalid_param(
                "wave",
                format!("{} cannot be used for a note", wave),
            ));
        }

        Ok(Self {
            pitch,
            velocity: velocity.clamp(-1.0, 1.0).abs(),
            start,
            length,
            wave,
        })
    }

    /// Creates a note from a pitch name such as `"Eb4"`.
    pub fn from_name(
        name: &str,
        velocity: f64,
        start: u32,
        length: u32,
        wave: WaveKind,
    ) -> ScoreResult<Self> {
        Self::new(name.parse()?, velocity, start, length, wave)
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.pitch.class()
    }

    pub fn octave(&self) -> u8 {
        self.pitch.octave()
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Start position in eighth-note units.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Length in eighth-note units.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// First grid position after the note.
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }

    pub fn wave(&self) -> WaveKind {
        self.wave
    }

    pub fn frequency(&self) -> f64 {
        self.pitch.frequency()
    }

    /// Returns true if the note sounds at grid `position`.
    pub fn covers(&self, position: u32) -> bool {
        self.start <= position && position < self.end()
    }

    /// Returns a copy of this note moved by `half_steps` semitones.
    pub fn pitch_shift(&self, half_steps: i32) -> ScoreResult<Self> {
        Ok(Self {
            pitch: self.pitch.shift(half_steps)?,
            ..self.clone()
        })
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N:{}|V:{:?}|S:{}|L:{}|W:{}",
            self.pitch, self.velocity, self.start, self.length, self.wave
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_is_clamped_and_positive() {
        let loud = Note::from_name("A4", 3.0, 0, 1, WaveKind::Sine).unwrap();
        assert_eq!(loud.velocity(), 1.0);

        let negative = Note::from_name("A4", -0.25, 0, 1, WaveKind::Sine).unwrap();
        assert_eq!(negative.velocity(), 0.25);

        assert!(Note::from_name("A4", f64::NAN, 0, 1, WaveKind::Sine).is_err());
    }

    #[test]
    fn test_rejects_zero_length_and_derived() {
        assert!(Note::from_name("A4", 1.0, 0, 0, WaveKind::Sine).is_err());
        assert!(Note::from_name("A4", 1.0, 0, 1, WaveKind::Derived).is_err());
    }

    #[test]
    fn test_covers_half_open_range() {
        let note = Note::from_name("E4", 1.0, 4, QUARTER_NOTE, WaveKind::Square).unwrap();
        assert!(!note.covers(3));
        assert!(note.covers(4));
        assert!(note.covers(5));
        assert!(!note.covers(6));
        assert_eq!(note.end(), 6);
    }

    #[test]
    fn test_pitch_shift_keeps_other_fields() {
        let note = Note::from_name("C4", 0.5, 8, HALF_NOTE, WaveKind::Sawtooth).unwrap();
        let down = note.pitch_shift(-1).unwrap();

        assert_eq!(down.pitch().to_string(), "B3");
        assert_eq!(down.velocity(), 0.5);
        assert_eq!(down.start(), 8);
        assert_eq!(down.length(), HALF_NOTE);
        assert_eq!(down.wave(), WaveKind::Sawtooth);
        assert_eq!(note.pitch().to_string(), "C4");
    }

    #[test]
    fn test_display_line() {
        let note = Note::from_name("Gb2", 0.75, 3, WHOLE_NOTE, WaveKind::Noise).unwrap();
        assert_eq!(note.to_string(), "N:Gb2|V:0.75|S:3|L:8|W:Noise");
    }
}
