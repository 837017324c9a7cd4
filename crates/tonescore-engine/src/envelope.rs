//! ADSR envelope rendering.
//!
//! The gain curve is built from four linear segments. Attack, decay and
//! sustain share a sample budget equal to the target length; release is
//! always appended in full, so the curve is longer than its target whenever
//! the release time is non-zero.

use tonescore_score::{EnvelopeSpec, WaveKind};
use tracing::trace;

use crate::buffer::{FitPolicy, SampleBuffer};
use crate::config::ms_to_samples;
use crate::error::EngineResult;

/// Linear ramp of `count` samples from `start` to `stop`, both endpoints included.
pub fn linear_ramp(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut ramp: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            ramp[count - 1] = stop;
            ramp
        }
    }
}

/// Renders the gain curve for a signal of `target_len` samples.
///
/// Total length is `min(A, T) + min(D, rem) + rem' + R` where `T` is the
/// target, `rem` what attack left of it and `rem'` what decay left.
pub fn render(spec: &EnvelopeSpec, target_len: usize, sample_rate: u32) -> SampleBuffer {
    let attack = ms_to_samples(spec.attack_ms, sample_rate);
    let decay = ms_to_samples(spec.decay_ms, sample_rate);
    let release = ms_to_samples(spec.release_ms, sample_rate);

    let mut curve = Vec::with_capacity(target_len + release);
    let mut budget = target_len as isize;

    if budget > 0 {
        let mut segment = linear_ramp(0.0, 1.0, attack);
        segment.truncate(budget as usize);
        curve.extend(segment);
        budget -= attack as isize;
    }

    if budget > 0 {
        let mut segment = linear_ramp(1.0, spec.sustain, decay);
        segment.truncate(budget as usize);
        curve.extend(segment);
        budget -= decay as isize;
    }

    if budget > 0 {
        curve.extend(std::iter::repeat(spec.sustain).take(budget as usize));
    }

    curve.extend(linear_ramp(spec.sustain, 0.0, release));

    trace!(
        target_len,
        attack,
        decay,
        release,
        rendered = curve.len(),
        "rendered envelope"
    );

    SampleBuffer::new(curve, WaveKind::Derived, 0.0, 1.0, sample_rate)
}

/// Shapes `signal` with the envelope.
///
/// The curve is rendered to the signal's length and the two are combined with
/// [`SampleBuffer::modulate`] using [`FitPolicy::Tile`], so the oscillation
/// keeps cycling under the release tail.
pub fn apply(spec: &EnvelopeSpec, signal: &SampleBuffer) -> EngineResult<SampleBuffer> {
    let curve = render(spec, signal.len(), signal.sample_rate());
    curve.modulate(signal, FitPolicy::Tile)
}
