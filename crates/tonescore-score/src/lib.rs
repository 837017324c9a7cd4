//! tonescore Score Library
//!
//! This crate provides the domain types shared by the tonescore engine and CLI:
//! pitches on a 12-tone equal-tempered table, notes placed on an eighth-note
//! grid, ADSR envelope and delay parameters, and the line-oriented score text
//! format.
//!
//! # Example
//!
//! ```
//! use tonescore_score::{format, Note, WaveKind};
//!
//! let note = Note::from_name("C4", 1.0, 0, 2, WaveKind::Sine).unwrap();
//! assert!((note.frequency() - 261.6).abs() < 0.01);
//!
//! let text = format::write_score(&[note.clone()]);
//! assert_eq!(text, "N:C4|V:1.0|S:0|L:2|W:Sine\n");
//!
//! let parsed = format::parse_score(&text).unwrap();
//! assert_eq!(parsed, vec![note]);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error type and stable error codes
//! - [`pitch`]: Pitch classes, octaves and the first-octave frequency table
//! - [`wave`]: Wave kind tags
//! - [`note`]: Notes and note-length constants
//! - [`envelope`]: ADSR envelope parameters
//! - [`delay`]: Delay effect parameters
//! - [`format`]: Score text parsing and writing

pub mod delay;
pub mod envelope;
pub mod error;
pub mod format;
pub mod note;
pub mod pitch;
pub mod wave;

// Re-export commonly used types at the crate root
pub use delay::{DelayParams, MAX_DELAY_REPETITIONS};
pub use envelope::EnvelopeSpec;
pub use error::{CodedError, ScoreError, ScoreResult};
pub use note::{Note, EIGHTH_NOTE, HALF_NOTE, QUARTER_NOTE, WHOLE_NOTE};
pub use pitch::{Pitch, PitchClass, MAX_OCTAVE, MIN_OCTAVE, OCTAVE1_FREQUENCIES};
pub use wave::WaveKind;
