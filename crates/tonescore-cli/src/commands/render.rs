//! Render command implementation
//!
//! Loads a score, applies session settings and flag overrides, renders the
//! mix and writes it as a WAV file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tonescore_engine::Composer;
use tonescore_score::DelayParams;
use tracing::info;

use super::json_output::RenderOutput;
use super::load_session;

/// Options for a render run.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Score text file to render.
    pub score: String,
    /// WAV file to write.
    pub output: String,
    /// Optional JSON session file.
    pub session: Option<String>,
    /// Overrides the session tempo.
    pub tempo: Option<u32>,
    /// Overrides the session seed.
    pub seed: Option<u32>,
    /// Disables the envelope.
    pub no_envelope: bool,
    /// Enables the default delay when the session has none.
    pub delay: bool,
    /// Also writes the score next to the WAV file as `<stem>Score.txt`.
    pub save_score: bool,
    /// Machine-readable output.
    pub json: bool,
}

/// Path of the score copy written next to `output`: `<stem>Score.txt`.
pub fn score_copy_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{}Score.txt", stem))
}

/// Whether `a` and `b` name the same file, resolving links when both exist.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Run the render command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(options: &RenderOptions) -> Result<ExitCode> {
    let start = Instant::now();

    let mut session = load_session(options.session.as_deref())?;
    if let Some(tempo) = options.tempo {
        session.tempo = tempo;
    }
    if let Some(seed) = options.seed {
        session.engine.seed = seed;
    }
    if options.no_envelope {
        session.apply_envelope = false;
    }
    if options.delay && session.delay.is_none() {
        session.delay = Some(DelayParams::default());
    }

    let mut composer =
        Composer::from_session(&session).context("Invalid render settings")?;
    composer
        .load_score(Path::new(&options.score))
        .with_context(|| format!("Failed to load score file: {}", options.score))?;

    if !options.json {
        println!("{} {}", "Rendering:".cyan().bold(), options.score);
        println!(
            "{} {} notes, tempo {}, envelope {}, delay {}",
            "Score:".dimmed(),
            composer.notes().len(),
            composer.tempo(),
            if composer.applies_envelope() { "on" } else { "off" },
            if composer.delay().is_some() { "on" } else { "off" },
        );
    }

    let output = Path::new(&options.output);
    let copy_path = options.save_score.then(|| score_copy_path(output));
    if let Some(path) = &copy_path {
        if same_file(path, Path::new(&options.score)) || same_file(path, output) {
            bail!(
                "Score copy {} would overwrite an input or output file",
                path.display()
            );
        }
    }

    let result = composer
        .render_to_wav(output)
        .with_context(|| format!("Failed to render to {}", options.output))?;

    if let Some(path) = &copy_path {
        composer
            .save_score(path)
            .with_context(|| format!("Failed to write score copy: {}", path.display()))?;
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    info!(
        output = %options.output,
        samples = result.num_samples,
        elapsed_ms,
        "render finished"
    );

    if options.json {
        let report = RenderOutput {
            success: true,
            output: options.output.clone(),
            score_copy: copy_path.as_ref().map(|p| p.display().to_string()),
            notes: composer.notes().len(),
            sample_rate: result.sample_rate,
            num_samples: result.num_samples,
            duration_seconds: result.duration_seconds(),
            pcm_hash: result.pcm_hash.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} ({:.2} s, {} samples @ {} Hz)",
            "Wrote:".green().bold(),
            options.output,
            result.duration_seconds(),
            result.num_samples,
            result.sample_rate
        );
        if let Some(path) = &copy_path {
            println!("{} {}", "Score:".green().bold(), path.display());
        }
        println!("{} {}", "PCM hash:".dimmed(), &result.pcm_hash[..16]);
        println!("{} {} ms", "Time:".dimmed(), elapsed_ms);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_score(dir: &Path) -> PathBuf {
        let path = dir.join("tune.txt");
        fs::write(
            &path,
            "# tune\nN:C4|V:0.5|S:0|L:2|W:Sine\nN:G4|V:0.5|S:2|L:2|W:Square\n",
        )
        .unwrap();
        path
    }

    fn options(dir: &Path) -> RenderOptions {
        RenderOptions {
            score: write_score(dir).display().to_string(),
            output: dir.join("render.wav").display().to_string(),
            tempo: Some(400),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_render_writes_wav_and_score_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = RenderOptions {
            save_score: true,
            delay: true,
            ..options(tmp.path())
        };

        let code = run(&opts).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let wav = fs::read(tmp.path().join("render.wav")).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");

        let copy = fs::read_to_string(tmp.path().join("renderScore.txt")).unwrap();
        assert_eq!(
            copy,
            "N:C4|V:0.5|S:0|L:2|W:Sine\nN:G4|V:0.5|S:2|L:2|W:Square\n"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = options(tmp.path());

        run(&opts).unwrap();
        let first = fs::read(&opts.output).unwrap();
        run(&opts).unwrap();
        let second = fs::read(&opts.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_bad_tempo_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = RenderOptions {
            tempo: Some(0),
            ..options(tmp.path())
        };
        assert!(run(&opts).is_err());
        assert!(!tmp.path().join("render.wav").exists());
    }

    #[test]
    fn test_missing_score_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = RenderOptions {
            score: tmp.path().join("nope.txt").display().to_string(),
            ..options(tmp.path())
        };
        let err = run(&opts).unwrap_err();
        assert!(format!("{:#}", err).contains("nope.txt"));
    }

    #[test]
    fn test_score_copy_keeps_input_score() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = RenderOptions {
            output: tmp.path().join("tune.wav").display().to_string(),
            save_score: true,
            ..options(tmp.path())
        };

        run(&opts).unwrap();

        let input = fs::read_to_string(&opts.score).unwrap();
        assert!(input.starts_with("# tune\n"));
        assert!(tmp.path().join("tuneScore.txt").exists());
    }

    #[test]
    fn test_txt_output_is_not_overwritten_by_score_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = RenderOptions {
            output: tmp.path().join("mix.txt").display().to_string(),
            save_score: true,
            ..options(tmp.path())
        };

        run(&opts).unwrap();

        let wav = fs::read(&opts.output).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        let copy = fs::read_to_string(tmp.path().join("mixScore.txt")).unwrap();
        assert!(copy.starts_with("N:C4"));
    }

    #[test]
    fn test_score_copy_onto_input_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let score = tmp.path().join("tuneScore.txt");
        fs::write(&score, "# keep me\nN:C4|V:0.5|S:0|L:2|W:Sine\n").unwrap();
        let opts = RenderOptions {
            score: score.display().to_string(),
            output: tmp.path().join("tune.wav").display().to_string(),
            save_score: true,
            ..options(tmp.path())
        };

        let err = run(&opts).unwrap_err();
        assert!(format!("{:#}", err).contains("would overwrite"));
        assert!(fs::read_to_string(&score).unwrap().starts_with("# keep me"));
        assert!(!tmp.path().join("tune.wav").exists());
    }

    #[test]
    fn test_score_copy_path() {
        assert_eq!(
            score_copy_path(Path::new("out/song.wav")),
            PathBuf::from("out/songScore.txt")
        );
        assert_eq!(
            score_copy_path(Path::new("mix.txt")),
            PathBuf::from("mixScore.txt")
        );
    }
}
