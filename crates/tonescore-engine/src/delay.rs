//! Multi-tap decaying delay.

use tonescore_score::DelayParams;
use tracing::{debug, warn};

use crate::buffer::SampleBuffer;
use crate::config::ms_to_samples;
use crate::error::EngineResult;

/// Gain of each repetition: `N` values falling linearly from just below 1.0
/// to `1 - decay` (the leading 1.0 of an `N + 1` point ramp is dropped).
pub fn tap_gains(repetitions: u32, decay: f64) -> Vec<f64> {
    let n = repetitions as f64;
    (1..=repetitions)
        .map(|r| 1.0 - decay * r as f64 / n)
        .collect()
}

/// Layers delayed, attenuated copies of `buffer` over it.
///
/// Repetition `r` is the input shifted by `r * delay_time` and scaled by its
/// tap gain. The echoes are summed into a delay-only buffer, and the output
/// is `input * (1 - mix) + echoes * mix`, the same length as the input.
/// With zero repetitions the input is returned unchanged.
pub fn apply(buffer: &SampleBuffer, params: &DelayParams) -> EngineResult<SampleBuffer> {
    params.validate()?;

    let repetitions = params.effective_repetitions();
    if repetitions < params.repetitions {
        warn!(
            requested = params.repetitions,
            used = repetitions,
            "delay repetitions capped"
        );
    }
    if repetitions == 0 {
        return Ok(buffer.clone());
    }

    let delay_samples = ms_to_samples(params.delay_time_ms, buffer.sample_rate());
    debug!(
        delay_samples,
        repetitions,
        mix = params.mix,
        decay = params.decay,
        "applying delay"
    );

    let mut echoes = SampleBuffer::silence(buffer.len(), buffer.sample_rate());
    for (r, gain) in (1..=repetitions as usize).zip(tap_gains(repetitions, params.decay)) {
        let tap = buffer.time_shift(r * delay_samples).scale(gain);
        echoes = echoes.superpose(&tap)?;
    }

    buffer
        .scale(1.0 - params.mix)
        .superpose(&echoes.scale(params.mix))
}
