//! tonescore synthesis engine.
//!
//! Generates waveforms sample by sample, combines them with a small signal
//! algebra, shapes notes with an ADSR envelope, layers a decaying delay over
//! the mix and writes the result as 16-bit PCM WAV.
//!
//! # Determinism
//!
//! All randomness comes from seeded PCG32 streams (see [`rng`]); each note of
//! a score gets its own stream, so renders are reproducible and do not depend
//! on how notes are scheduled across threads.
//!
//! # Example
//!
//! ```
//! use tonescore_engine::{Composer, EngineConfig};
//! use tonescore_score::{Note, WaveKind};
//!
//! let mut composer = Composer::new(EngineConfig {
//!     total_eighth_notes: 8,
//!     ..EngineConfig::default()
//! });
//! composer.set_apply_envelope(false);
//! composer.add_note(Note::from_name("A4", 0.5, 0, 2, WaveKind::Sine).unwrap());
//!
//! let mix = composer.render().unwrap();
//! assert_eq!(mix.len(), 8 * 3375);
//! assert!(mix.peak() <= 0.5);
//! ```

pub mod buffer;
pub mod composer;
pub mod config;
pub mod delay;
pub mod envelope;
pub mod error;
pub mod generator;
pub mod note;
pub mod rng;
pub mod wav;

pub use buffer::{FitPolicy, SampleBuffer};
pub use composer::Composer;
pub use config::{
    EngineConfig, SessionConfig, DEFAULT_SAMPLE_RATE, DEFAULT_TEMPO, DEFAULT_TOTAL_EIGHTH_NOTES,
    MAX_RENDER_SAMPLES,
};
pub use error::{EngineError, EngineResult};
pub use generator::{generate, generate_samples, Synthesizer};
pub use note::render_note;
pub use wav::{write_wav_file, WavResult};
