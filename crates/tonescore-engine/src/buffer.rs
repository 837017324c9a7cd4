//! Sample buffers and the signal algebra over them.
//!
//! A [`SampleBuffer`] is immutable: every operation borrows its operands and
//! returns a new buffer. Binary operations align both operands at sample 0
//! and fail with [`EngineError::SampleRateMismatch`] when the rates differ.
//!
//! Results of combining two buffers are tagged [`WaveKind::Derived`]. Their
//! `frequency` is the least common multiple of the truncated operand
//! frequencies and their `amplitude` is the peak absolute sample. Both are
//! descriptive only and never feed back into synthesis.

use tonescore_score::WaveKind;

use crate::error::{EngineError, EngineResult};

/// How a buffer is extended when it must cover more samples than it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Repeat the buffer from its first sample.
    #[default]
    Tile,
    /// Repeat the last sample.
    Hold,
    /// Append silence.
    ZeroPad,
}

/// An immutable run of mono samples in [-1, 1] plus descriptive metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    kind: WaveKind,
    frequency: f64,
    amplitude: f64,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wraps raw samples, clamping each to [-1, 1].
    pub fn new(
        samples: Vec<f64>,
        kind: WaveKind,
        frequency: f64,
        amplitude: f64,
        sample_rate: u32,
    ) -> Self {
        Self {
            samples: clamp_all(samples),
            kind,
            frequency,
            amplitude,
            sample_rate,
        }
    }

    /// `len` samples of silence.
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; len],
            kind: WaveKind::Constant,
            frequency: 0.0,
            amplitude: 0.0,
            sample_rate,
        }
    }

    fn derived(samples: Vec<f64>, frequency: f64, sample_rate: u32) -> Self {
        let samples = clamp_all(samples);
        let amplitude = peak_of(&samples);
        Self {
            samples,
            kind: WaveKind::Derived,
            frequency,
            amplitude,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn kind(&self) -> WaveKind {
        self.kind
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds, `len / sample_rate`.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        peak_of(&self.samples)
    }

    fn check_rate(&self, other: &SampleBuffer) -> EngineResult<()> {
        if self.sample_rate != other.sample_rate {
            return Err(EngineError::SampleRateMismatch {
                left: self.sample_rate,
                right: other.sample_rate,
            });
        }
        Ok(())
    }

    /// Applies `op` on the overlap; the longer operand's tail is copied as is.
    fn combine_aligned(
        &self,
        other: &SampleBuffer,
        op: impl Fn(f64, f64) -> f64,
    ) -> EngineResult<SampleBuffer> {
        self.check_rate(other)?;

        let overlap = self.len().min(other.len());
        let longer = if self.len() >= other.len() {
            &self.samples
        } else {
            &other.samples
        };

        let mut out = Vec::with_capacity(longer.len());
        out.extend(
            self.samples[..overlap]
                .iter()
                .zip(&other.samples[..overlap])
                .map(|(&a, &b)| op(a, b)),
        );
        out.extend_from_slice(&longer[overlap..]);

        Ok(SampleBuffer::derived(
            out,
            lcm_frequency(self.frequency, other.frequency),
            self.sample_rate,
        ))
    }

    /// Sample-wise sum over the overlap, clamped once at the end.
    pub fn superpose(&self, other: &SampleBuffer) -> EngineResult<SampleBuffer> {
        self.combine_aligned(other, |a, b| a + b)
    }

    /// `self - other` over the overlap, whichever operand is longer; the longer
    /// tail is kept unchanged.
    pub fn subtract(&self, other: &SampleBuffer) -> EngineResult<SampleBuffer> {
        self.combine_aligned(other, |a, b| a - b)
    }

    /// Sample-wise product over the overlap; the longer tail is kept unchanged.
    pub fn multiply(&self, other: &SampleBuffer) -> EngineResult<SampleBuffer> {
        self.combine_aligned(other, |a, b| a * b)
    }

    /// Multiplies every sample by `factor`.
    ///
    /// The factor is clamped to [-1, 1] and negative values become 0, so
    /// scaling never inverts polarity.
    pub fn scale(&self, factor: f64) -> SampleBuffer {
        let factor = factor.clamp(-1.0, 1.0).max(0.0);
        SampleBuffer {
            samples: self.samples.iter().map(|s| s * factor).collect(),
            kind: self.kind,
            frequency: self.frequency,
            amplitude: self.amplitude * factor,
            sample_rate: self.sample_rate,
        }
    }

    /// Appends `other` after `self`.
    pub fn concatenate(&self, other: &SampleBuffer) -> EngineResult<SampleBuffer> {
        self.check_rate(other)?;

        let mut out = Vec::with_capacity(self.len() + other.len());
        out.extend_from_slice(&self.samples);
        out.extend_from_slice(&other.samples);

        Ok(SampleBuffer::derived(
            out,
            lcm_frequency(self.frequency, other.frequency),
            self.sample_rate,
        ))
    }

    /// Fits the shorter operand to the longer length with `policy`, then
    /// multiplies over the full length.
    pub fn modulate(&self, other: &SampleBuffer, policy: FitPolicy) -> EngineResult<SampleBuffer> {
        self.check_rate(other)?;

        let len = self.len().max(other.len());
        let a = self.fit(len, policy);
        let b = other.fit(len, policy);

        let out = a
            .samples
            .iter()
            .zip(&b.samples)
            .map(|(x, y)| x * y)
            .collect();

        Ok(SampleBuffer::derived(
            out,
            lcm_frequency(self.frequency, other.frequency),
            self.sample_rate,
        ))
    }

    /// Resizes to exactly `len` samples: truncates, or extends with `policy`.
    ///
    /// An empty buffer can only be extended with silence.
    pub fn fit(&self, len: usize, policy: FitPolicy) -> SampleBuffer {
        let mut samples = Vec::with_capacity(len);
        if len <= self.len() {
            samples.extend_from_slice(&self.samples[..len]);
        } else if self.is_empty() {
            samples.resize(len, 0.0);
        } else {
            samples.extend_from_slice(&self.samples);
            match policy {
                FitPolicy::Tile => {
                    samples.extend(self.samples.iter().cycle().take(len - self.len()));
                }
                FitPolicy::Hold => {
                    let last = self.samples[self.len() - 1];
                    samples.resize(len, last);
                }
                FitPolicy::ZeroPad => samples.resize(len, 0.0),
            }
        }

        SampleBuffer {
            samples,
            kind: self.kind,
            frequency: self.frequency,
            amplitude: self.amplitude,
            sample_rate: self.sample_rate,
        }
    }

    /// Delays the content by `n` samples, keeping the length.
    ///
    /// The first `min(n, len)` samples are silence; whatever is pushed past
    /// the end is dropped.
    pub fn time_shift(&self, n: usize) -> SampleBuffer {
        let len = self.len();
        let n = n.min(len);

        let mut samples = vec![0.0; n];
        samples.extend_from_slice(&self.samples[..len - n]);

        SampleBuffer {
            samples,
            kind: self.kind,
            frequency: self.frequency,
            amplitude: self.amplitude,
            sample_rate: self.sample_rate,
        }
    }
}

fn clamp_all(mut samples: Vec<f64>) -> Vec<f64> {
    for s in &mut samples {
        *s = s.clamp(-1.0, 1.0);
    }
    samples
}

fn peak_of(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0, |peak: f64, s| peak.max(s.abs()))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Least common multiple of the integer parts of two frequencies.
///
/// A frequency that truncates to 0 carries no pitch and the other operand's
/// frequency is returned unchanged.
pub fn lcm_frequency(f1: f64, f2: f64) -> f64 {
    let a = if f1.is_finite() && f1 > 0.0 { f1.trunc() as u64 } else { 0 };
    let b = if f2.is_finite() && f2 > 0.0 { f2.trunc() as u64 } else { 0 };

    match (a, b) {
        (0, 0) => 0.0,
        (0, _) => f2,
        (_, 0) => f1,
        _ => (a / gcd(a, b)).saturating_mul(b) as f64,
    }
}
