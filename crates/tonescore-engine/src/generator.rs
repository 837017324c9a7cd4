//! Waveform generation.
//!
//! Periodic waves are built from a single cycle of
//! `round(sample_rate / frequency)` samples which is then tiled to the
//! requested length. When the cycle does not divide the length evenly the last
//! cycle is cut short, leaving a phase seam at the end of the buffer.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand_pcg::Pcg32;
use tonescore_score::WaveKind;

use crate::buffer::SampleBuffer;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Common trait for all waveform generators.
pub trait Synthesizer {
    /// Generates `num_samples` samples in [-1, 1].
    fn synthesize(&self, num_samples: usize, sample_rate: f64, rng: &mut Pcg32) -> Vec<f64>;
}

/// Number of samples in one cycle of `frequency`.
///
/// `None` when the rounded cycle length is not a representable sample count.
pub fn cycle_length(frequency: f64, sample_rate: f64) -> Option<usize> {
    let len = (sample_rate / frequency).round();
    if !len.is_finite() || len < 0.0 || len >= u64::MAX as f64 {
        return None;
    }
    usize::try_from(len as u64).ok()
}

/// Builds `num_samples` samples of a wave whose cycle is `shape` sampled at
/// phases `k * TAU / cycle_len`.
///
/// At most one cycle is materialised, and never more than `num_samples` of it.
fn periodic(
    frequency: f64,
    sample_rate: f64,
    num_samples: usize,
    shape: impl Fn(f64) -> f64,
) -> Vec<f64> {
    let len = cycle_length(frequency, sample_rate).unwrap_or(0);
    if len == 0 {
        return vec![0.0; num_samples];
    }
    let step = TAU / len as f64;
    let cycle: Vec<f64> = (0..len.min(num_samples))
        .map(|k| shape(k as f64 * step))
        .collect();
    cycle.iter().copied().cycle().take(num_samples).collect()
}

/// Sine wave.
#[derive(Debug, Clone)]
pub struct SineSynth {
    pub frequency: f64,
    pub amplitude: f64,
}

impl Synthesizer for SineSynth {
    fn synthesize(&self, num_samples: usize, sample_rate: f64, _rng: &mut Pcg32) -> Vec<f64> {
        periodic(self.frequency, sample_rate, num_samples, |phase| {
            phase.sin() * self.amplitude
        })
    }
}

/// Square wave: the sign of the sine cycle, with `sign(0) = 0`.
#[derive(Debug, Clone)]
pub struct SquareSynth {
    pub frequency: f64,
    pub amplitude: f64,
}

impl Synthesizer for SquareSynth {
    fn synthesize(&self, num_samples: usize, sample_rate: f64, _rng: &mut Pcg32) -> Vec<f64> {
        periodic(self.frequency, sample_rate, num_samples, |phase| {
            let s = phase.sin();
            let sign = if s > 0.0 {
                1.0
            } else if s < 0.0 {
                -1.0
            } else {
                0.0
            };
            sign * self.amplitude
        })
    }
}

/// Sawtooth falling from `amplitude` to `-amplitude` over each cycle.
#[derive(Debug, Clone)]
pub struct SawtoothSynth {
    pub frequency: f64,
    pub amplitude: f64,
}

impl Synthesizer for SawtoothSynth {
    fn synthesize(&self, num_samples: usize, sample_rate: f64, _rng: &mut Pcg32) -> Vec<f64> {
        periodic(self.frequency, sample_rate, num_samples, |phase| {
            self.amplitude * (1.0 - phase / PI)
        })
    }
}

/// Every sample equals `amplitude`.
#[derive(Debug, Clone)]
pub struct ConstantSynth {
    pub amplitude: f64,
}

impl Synthesizer for ConstantSynth {
    fn synthesize(&self, num_samples: usize, _sample_rate: f64, _rng: &mut Pcg32) -> Vec<f64> {
        vec![self.amplitude; num_samples]
    }
}

/// Uniform white noise in `[-amplitude, amplitude]`.
#[derive(Debug, Clone)]
pub struct NoiseSynth {
    pub amplitude: f64,
}

impl Synthesizer for NoiseSynth {
    fn synthesize(&self, num_samples: usize, _sample_rate: f64, rng: &mut Pcg32) -> Vec<f64> {
        (0..num_samples)
            .map(|_| rng.gen_range(-1.0..=1.0) * self.amplitude)
            .collect()
    }
}

fn synth_for(kind: WaveKind, frequency: f64, amplitude: f64) -> EngineResult<Box<dyn Synthesizer>> {
    let synth: Box<dyn Synthesizer> = match kind {
        WaveKind::Sine => Box::new(SineSynth {
            frequency,
            amplitude,
        }),
        WaveKind::Square => Box::new(SquareSynth {
            frequency,
            amplitude,
        }),
        WaveKind::Sawtooth => Box::new(SawtoothSynth {
            frequency,
            amplitude,
        }),
        WaveKind::Constant => Box::new(ConstantSynth { amplitude }),
        WaveKind::Noise => Box::new(NoiseSynth { amplitude }),
        WaveKind::Derived => {
            return Err(EngineError::invalid_param(
                "kind",
                "Derived buffers cannot be generated",
            ))
        }
    };
    Ok(synth)
}

/// Generates exactly `num_samples` samples of `kind`.
///
/// Amplitude is clamped to [-1, 1]. Frequency is only checked for periodic
/// kinds: it must be positive and give a cycle length between one sample and
/// the largest representable count. Only the requested samples are built, so
/// very low frequencies stay cheap.
pub fn generate_samples(
    kind: WaveKind,
    frequency: f64,
    amplitude: f64,
    num_samples: usize,
    sample_rate: u32,
    rng: &mut Pcg32,
) -> EngineResult<SampleBuffer> {
    if sample_rate == 0 {
        return Err(EngineError::InvalidSampleRate { rate: sample_rate });
    }
    if amplitude.is_nan() {
        return Err(EngineError::invalid_param("amplitude", "must be a number"));
    }
    let amplitude = amplitude.clamp(-1.0, 1.0);

    if kind.is_periodic() {
        let spans_samples = matches!(
            cycle_length(frequency, sample_rate as f64),
            Some(len) if len > 0
        );
        if !frequency.is_finite() || frequency <= 0.0 || !spans_samples {
            return Err(EngineError::InvalidFrequency { freq: frequency });
        }
    }

    let synth = synth_for(kind, frequency, amplitude)?;
    let samples = synth.synthesize(num_samples, sample_rate as f64, rng);

    Ok(SampleBuffer::new(
        samples,
        kind,
        if kind.is_periodic() { frequency } else { 0.0 },
        amplitude.abs(),
        sample_rate,
    ))
}

/// Generates `duration_secs` of `kind` at the configured sample rate.
///
/// The buffer holds `round(duration_secs * sample_rate)` samples; a zero
/// duration gives an empty buffer.
pub fn generate(
    kind: WaveKind,
    frequency: f64,
    amplitude: f64,
    duration_secs: f64,
    config: &EngineConfig,
    rng: &mut Pcg32,
) -> EngineResult<SampleBuffer> {
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(EngineError::InvalidDuration {
            duration: duration_secs,
        });
    }
    let num_samples = (duration_secs * config.sample_rate as f64).round() as usize;
    generate_samples(kind, frequency, amplitude, num_samples, config.sample_rate, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_sine_cycle_shape() {
        let mut rng = create_rng(0);
        // 11250 / 2812.5 = 4 samples per cycle.
        let buf = generate_samples(WaveKind::Sine, 2812.5, 0.5, 8, 11250, &mut rng).unwrap();
        let expected = [0.0, 0.5, 0.0, -0.5, 0.0, 0.5, 0.0, -0.5];
        for (got, want) in buf.samples().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{} vs {}", got, want);
        }
        assert_eq!(buf.kind(), WaveKind::Sine);
        assert_eq!(buf.frequency(), 2812.5);
    }

    #[test]
    fn test_square_sign_of_zero() {
        let mut rng = create_rng(0);
        let buf = generate_samples(WaveKind::Square, 2812.5, 0.8, 4, 11250, &mut rng).unwrap();
        assert_eq!(buf.samples()[0], 0.0);
        assert_eq!(buf.samples()[1], 0.8);
        assert_eq!(buf.samples()[3], -0.8);
    }

    #[test]
    fn test_sawtooth_ramp() {
        let mut rng = create_rng(0);
        let buf = generate_samples(WaveKind::Sawtooth, 2812.5, 1.0, 5, 11250, &mut rng).unwrap();
        let expected = [1.0, 0.5, 0.0, -0.5, 1.0];
        for (got, want) in buf.samples().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_and_silence() {
        let mut rng = create_rng(0);
        let buf = generate(WaveKind::Constant, 0.0, 0.25, 0.01, &config(), &mut rng).unwrap();
        assert!(buf.samples().iter().all(|&s| s == 0.25));

        let quiet = generate(WaveKind::Constant, 0.0, 0.0, 0.01, &config(), &mut rng).unwrap();
        assert!(quiet.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_noise_honours_amplitude() {
        let mut rng = create_rng(3);
        let buf = generate(WaveKind::Noise, 0.0, 0.2, 1.0, &config(), &mut rng).unwrap();
        assert!(buf.samples().iter().all(|s| s.abs() <= 0.2));
        assert!(buf.peak() > 0.1);
    }

    #[test]
    fn test_noise_is_seeded() {
        let a = generate(WaveKind::Noise, 0.0, 1.0, 0.1, &config(), &mut create_rng(9)).unwrap();
        let b = generate(WaveKind::Noise, 0.0, 1.0, 0.1, &config(), &mut create_rng(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_amplitude_clamped() {
        let mut rng = create_rng(0);
        let buf = generate(WaveKind::Constant, 0.0, 4.0, 0.01, &config(), &mut rng).unwrap();
        assert!(buf.samples().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_rejections() {
        let mut rng = create_rng(0);
        let cfg = config();
        assert!(matches!(
            generate(WaveKind::Sine, 0.0, 1.0, 1.0, &cfg, &mut rng),
            Err(EngineError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            generate(WaveKind::Square, -10.0, 1.0, 1.0, &cfg, &mut rng),
            Err(EngineError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            generate(WaveKind::Sawtooth, 1.0e6, 1.0, 1.0, &cfg, &mut rng),
            Err(EngineError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            generate(WaveKind::Sine, 440.0, 1.0, -1.0, &cfg, &mut rng),
            Err(EngineError::InvalidDuration { .. })
        ));
        assert!(generate(WaveKind::Derived, 440.0, 1.0, 1.0, &cfg, &mut rng).is_err());
    }

    #[test]
    fn test_zero_duration_is_empty() {
        let mut rng = create_rng(0);
        let buf = generate(WaveKind::Sine, 440.0, 1.0, 0.0, &config(), &mut rng).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_very_low_frequency_builds_only_requested_samples() {
        let mut rng = create_rng(0);
        for kind in [WaveKind::Sine, WaveKind::Square, WaveKind::Sawtooth] {
            let buf = generate_samples(kind, 1e-9, 1.0, 10, 11250, &mut rng).unwrap();
            assert_eq!(buf.len(), 10);
        }

        let sine = generate_samples(WaveKind::Sine, 1e-9, 1.0, 10, 11250, &mut rng).unwrap();
        assert_eq!(sine.samples()[0], 0.0);
        assert!(sine.samples().iter().all(|s| s.abs() < 1e-6));

        let saw = generate_samples(WaveKind::Sawtooth, 1e-9, 1.0, 10, 11250, &mut rng).unwrap();
        assert!(saw.samples().iter().all(|&s| (s - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_unrepresentable_cycle_rejected() {
        let mut rng = create_rng(0);
        assert_eq!(cycle_length(1e-300, 11250.0), None);
        assert!(matches!(
            generate_samples(WaveKind::Sine, 1e-300, 1.0, 10, 11250, &mut rng),
            Err(EngineError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            generate_samples(WaveKind::Sawtooth, f64::MIN_POSITIVE, 1.0, 10, 11250, &mut rng),
            Err(EngineError::InvalidFrequency { .. })
        ));
    }

    #[test]
    fn test_cycle_length() {
        assert_eq!(cycle_length(2812.5, 11250.0), Some(4));
        assert_eq!(cycle_length(1.0e6, 11250.0), Some(0));
        assert_eq!(cycle_length(f64::INFINITY, 11250.0), Some(0));
    }
}
