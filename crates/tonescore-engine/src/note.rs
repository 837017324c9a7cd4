//! Rendering a single note to a full-score buffer.

use rand_pcg::Pcg32;
use tonescore_score::{EnvelopeSpec, Note};
use tracing::trace;

use crate::buffer::{FitPolicy, SampleBuffer};
use crate::config::{validate_tempo, EngineConfig};
use crate::envelope;
use crate::error::EngineResult;
use crate::generator::generate_samples;

/// Renders `note` as lead silence, the (optionally enveloped) oscillation and
/// trailing silence.
///
/// Sample positions come from the score grid: the note occupies
/// `grid(start)..grid(start + length)`. The result is exactly
/// `max(score_samples, grid(start + length))` samples long. An envelope's
/// release tail rings into the trailing silence and is cut at the end of the
/// score; without an envelope every sample from the note's end onward is 0.
///
/// Fails without allocating when either length exceeds
/// [`MAX_RENDER_SAMPLES`](crate::config::MAX_RENDER_SAMPLES).
pub fn render_note(
    note: &Note,
    tempo: u32,
    envelope_spec: &EnvelopeSpec,
    apply_envelope: bool,
    config: &EngineConfig,
    rng: &mut Pcg32,
) -> EngineResult<SampleBuffer> {
    validate_tempo(tempo)?;
    config.validate()?;

    let sample_rate = config.sample_rate;
    let lead = config.checked_grid_to_samples(note.start(), tempo)?;
    let end = config.checked_grid_to_samples(note.end(), tempo)?;
    let total = config.checked_score_samples(tempo)?.max(end);

    let oscillation = generate_samples(
        note.wave(),
        note.frequency(),
        note.velocity(),
        end - lead,
        sample_rate,
        rng,
    )?;

    let shaped = if apply_envelope {
        envelope::apply(envelope_spec, &oscillation)?
    } else {
        oscillation
    };

    let voiced = SampleBuffer::silence(lead, sample_rate).concatenate(&shaped)?;
    let trailing = SampleBuffer::silence(total.saturating_sub(voiced.len()), sample_rate);
    let rendered = voiced
        .concatenate(&trailing)?
        .fit(total, FitPolicy::ZeroPad);

    trace!(
        note = %note,
        lead,
        end,
        total,
        "rendered note"
    );

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::rng::create_rng;
    use tonescore_score::WaveKind;

    fn config(total: u32) -> EngineConfig {
        EngineConfig {
            total_eighth_notes: total,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_lead_and_trailing_silence() {
        let cfg = config(8);
        let note = Note::from_name("A4", 0.5, 2, 1, WaveKind::Square).unwrap();
        let buf = render_note(
            &note,
            100,
            &EnvelopeSpec::default(),
            false,
            &cfg,
            &mut create_rng(0),
        )
        .unwrap();

        assert_eq!(buf.len(), 8 * 3375);
        assert!(buf.samples()[..2 * 3375].iter().all(|&s| s == 0.0));
        assert!(buf.samples()[3 * 3375..].iter().all(|&s| s == 0.0));
        assert!(buf.samples()[2 * 3375..3 * 3375]
            .iter()
            .any(|&s| s == 0.5));
    }

    #[test]
    fn test_note_past_score_end_is_not_truncated() {
        let cfg = config(4);
        let note = Note::from_name("C4", 1.0, 3, 2, WaveKind::Sine).unwrap();
        let buf = render_note(
            &note,
            100,
            &EnvelopeSpec::default(),
            false,
            &cfg,
            &mut create_rng(0),
        )
        .unwrap();

        assert_eq!(buf.len(), 5 * 3375);
    }

    #[test]
    fn test_release_rings_into_silence() {
        let cfg = config(4);
        let envelope = EnvelopeSpec::new(10.0, 10.0, 1.0, 100.0).unwrap();
        let note = Note::from_name("C4", 1.0, 0, 1, WaveKind::Constant).unwrap();
        let buf = render_note(&note, 100, &envelope, true, &cfg, &mut create_rng(0)).unwrap();

        assert_eq!(buf.len(), 4 * 3375);
        // Release is 1125 samples long and starts at the note's end.
        assert!(buf.samples()[3375] > 0.9);
        assert!(buf.samples()[3375 + 1124] == 0.0);
        assert!(buf.samples()[3375 + 1125..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_rejects_note_past_render_limit() {
        let note = Note::from_name("C4", 1.0, 4_000_000_000, 1, WaveKind::Sine).unwrap();
        let result = render_note(
            &note,
            1,
            &EnvelopeSpec::default(),
            true,
            &config(8),
            &mut create_rng(0),
        );
        assert!(matches!(result, Err(EngineError::InvalidParameter { .. })));
    }

    #[test]
    fn test_rejects_zero_tempo() {
        let note = Note::from_name("C4", 1.0, 0, 1, WaveKind::Sine).unwrap();
        assert!(render_note(
            &note,
            0,
            &EnvelopeSpec::default(),
            false,
            &config(8),
            &mut create_rng(0)
        )
        .is_err());
    }
}
