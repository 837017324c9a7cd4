//! Score ownership and full-score rendering.
//!
//! The [`Composer`] is the surface a front end drives: it owns the tempo,
//! the ordered note list, the envelope settings and an optional delay, and
//! turns them into one mixed buffer.

use std::path::Path;

use rayon::prelude::*;
use tonescore_score::{format, DelayParams, EnvelopeSpec, Note, Pitch};
use tracing::{debug, info_span, warn};

use crate::buffer::SampleBuffer;
use crate::config::{validate_tempo, EngineConfig, SessionConfig, DEFAULT_TEMPO};
use crate::delay;
use crate::error::EngineResult;
use crate::note::render_note;
use crate::rng::create_note_rng;
use crate::wav::{write_wav_file, WavResult};

/// Owns a score and renders it.
#[derive(Debug, Clone)]
pub struct Composer {
    config: EngineConfig,
    tempo: u32,
    notes: Vec<Note>,
    apply_envelope: bool,
    envelope: EnvelopeSpec,
    delay: Option<DelayParams>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Composer {
    /// Creates an empty composer with default musical settings.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            tempo: DEFAULT_TEMPO,
            notes: Vec::new(),
            apply_envelope: true,
            envelope: EnvelopeSpec::default(),
            delay: None,
        }
    }

    /// Creates an empty composer from validated session settings.
    pub fn from_session(session: &SessionConfig) -> EngineResult<Self> {
        session.validate()?;
        Ok(Self {
            config: session.engine,
            tempo: session.tempo,
            notes: Vec::new(),
            apply_envelope: session.apply_envelope,
            envelope: session.envelope,
            delay: session.delay,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    pub fn envelope(&self) -> &EnvelopeSpec {
        &self.envelope
    }

    pub fn applies_envelope(&self) -> bool {
        self.apply_envelope
    }

    pub fn delay(&self) -> Option<&DelayParams> {
        self.delay.as_ref()
    }

    /// Appends a note; insertion order is the layering order.
    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Removes every note of `pitch` sounding at grid `position`.
    ///
    /// Returns the indices the removed notes had before removal.
    pub fn remove_notes_at(&mut self, position: u32, pitch: Pitch) -> Vec<usize> {
        let removed: Vec<usize> = self
            .notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.pitch() == pitch && note.covers(position))
            .map(|(idx, _)| idx)
            .collect();

        let mut idx = 0;
        self.notes.retain(|_| {
            let keep = !removed.contains(&idx);
            idx += 1;
            keep
        });

        removed
    }

    pub fn set_tempo(&mut self, tempo: u32) -> EngineResult<()> {
        validate_tempo(tempo)?;
        self.tempo = tempo;
        Ok(())
    }

    pub fn set_envelope(&mut self, envelope: EnvelopeSpec) -> EngineResult<()> {
        envelope.validate()?;
        self.envelope = envelope;
        Ok(())
    }

    pub fn set_apply_envelope(&mut self, apply: bool) {
        self.apply_envelope = apply;
    }

    /// Sets or clears the delay applied to the final mix.
    pub fn set_delay(&mut self, delay: Option<DelayParams>) -> EngineResult<()> {
        if let Some(params) = &delay {
            params.validate()?;
        }
        self.delay = delay;
        Ok(())
    }

    /// Removes every note.
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Shifts every note by `half_steps` semitones.
    ///
    /// All-or-nothing: if any note would leave the pitch range the score is
    /// left untouched.
    pub fn transpose(&mut self, half_steps: i32) -> EngineResult<()> {
        let shifted = self
            .notes
            .iter()
            .map(|note| note.pitch_shift(half_steps))
            .collect::<Result<Vec<_>, _>>()?;
        self.notes = shifted;
        Ok(())
    }

    /// Replaces the notes with those in the score file at `path`.
    ///
    /// The current notes are kept if the file cannot be read or parsed.
    pub fn load_score(&mut self, path: &Path) -> EngineResult<()> {
        let notes = format::read_score_file(path)?;
        debug!(path = %path.display(), notes = notes.len(), "loaded score");
        self.notes = notes;
        Ok(())
    }

    /// Writes the notes to `path` in score text format.
    pub fn save_score(&self, path: &Path) -> EngineResult<()> {
        format::write_score_file(path, &self.notes)?;
        debug!(path = %path.display(), notes = self.notes.len(), "saved score");
        Ok(())
    }

    /// Renders every note and mixes them into one buffer.
    ///
    /// Notes render in parallel, each with its own noise stream derived from
    /// the seed and its index, and are superposed in insertion order onto a
    /// silent score-length buffer. The delay, if set, runs on the mix.
    ///
    /// Scores reaching past [`MAX_RENDER_SAMPLES`](crate::config::MAX_RENDER_SAMPLES)
    /// at the current tempo are rejected before any note is rendered.
    pub fn render(&self) -> EngineResult<SampleBuffer> {
        validate_tempo(self.tempo)?;
        self.config.validate()?;
        self.envelope.validate()?;
        if let Some(params) = &self.delay {
            params.validate()?;
        }
        let score_len = self.config.checked_score_samples(self.tempo)?;
        for note in &self.notes {
            self.config.checked_grid_to_samples(note.end(), self.tempo)?;
        }

        let span = info_span!("render", tempo = self.tempo, notes = self.notes.len());
        let _guard = span.enter();

        let rendered = self
            .notes
            .par_iter()
            .enumerate()
            .map(|(idx, note)| {
                let mut rng = create_note_rng(self.config.seed, idx as u32);
                render_note(
                    note,
                    self.tempo,
                    &self.envelope,
                    self.apply_envelope,
                    &self.config,
                    &mut rng,
                )
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let mut mix = SampleBuffer::silence(score_len, self.config.sample_rate);
        for voice in &rendered {
            mix = mix.superpose(voice)?;
        }

        let clipped = mix.samples().iter().filter(|s| s.abs() >= 1.0).count();
        if clipped > 0 {
            warn!(clipped, "mix saturated");
        }

        let output = match &self.delay {
            Some(params) => delay::apply(&mix, params)?,
            None => mix,
        };

        debug!(
            samples = output.len(),
            duration = output.duration(),
            "render complete"
        );
        Ok(output)
    }

    /// Renders and writes a WAV file.
    pub fn render_to_wav(&self, path: &Path) -> EngineResult<WavResult> {
        let buffer = self.render()?;
        write_wav_file(path, &buffer)
    }
}
