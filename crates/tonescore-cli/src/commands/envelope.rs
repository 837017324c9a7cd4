//! Envelope command implementation
//!
//! Prints the ADSR outline and the sample length of each segment.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use tonescore_score::EnvelopeSpec;

use super::json_output::{EnvelopeOutput, OutlinePoint, SegmentSamples};
use super::load_session;

/// Per-parameter overrides; `None` keeps the session value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeOverrides {
    pub attack_ms: Option<f64>,
    pub decay_ms: Option<f64>,
    pub sustain: Option<f64>,
    pub release_ms: Option<f64>,
}

impl EnvelopeOverrides {
    /// Applies the overrides and validates the result.
    pub fn apply(&self, base: EnvelopeSpec) -> Result<EnvelopeSpec> {
        let spec = EnvelopeSpec::new(
            self.attack_ms.unwrap_or(base.attack_ms),
            self.decay_ms.unwrap_or(base.decay_ms),
            self.sustain.unwrap_or(base.sustain),
            self.release_ms.unwrap_or(base.release_ms),
        )?;
        Ok(spec)
    }
}

/// Run the envelope command
pub fn run(
    session_path: Option<&str>,
    overrides: EnvelopeOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let session = load_session(session_path)?;
    let spec = overrides.apply(session.envelope)?;
    let engine = session.engine;

    let counts = SegmentSamples {
        attack: engine.ms_to_samples(spec.attack_ms),
        decay: engine.ms_to_samples(spec.decay_ms),
        release: engine.ms_to_samples(spec.release_ms),
    };
    let outline = spec.outline();

    if json_output {
        let output = EnvelopeOutput {
            envelope: spec,
            sample_rate: engine.sample_rate,
            segment_samples: counts,
            outline: outline
                .iter()
                .map(|&(time_ms, gain)| OutlinePoint { time_ms, gain })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} A {} ms, D {} ms, S {}, R {} ms",
        "Envelope:".cyan().bold(),
        spec.attack_ms,
        spec.decay_ms,
        spec.sustain,
        spec.release_ms
    );
    let segments = [
        ("attack", counts.attack),
        ("decay", counts.decay),
        ("release", counts.release),
    ];
    for (name, count) in &segments {
        println!(
            "  {:<8} {} samples @ {} Hz",
            name,
            count,
            engine.sample_rate
        );
    }
    println!("{}", "Outline (ms, gain):".dimmed());
    for (t, g) in &outline {
        println!("  {:>9.1}  {:.3}", t, g);
    }

    Ok(ExitCode::SUCCESS)
}
