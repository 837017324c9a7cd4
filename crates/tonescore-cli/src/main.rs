//! tonescore CLI - render note scores to WAV
//!
//! This binary provides commands for rendering, validating, inspecting and
//! transposing score files, and for previewing envelope settings.

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tonescore_cli::commands;
use tonescore_cli::commands::envelope::EnvelopeOverrides;
use tonescore_cli::commands::render::RenderOptions;

/// tonescore - a small score-driven synthesizer
#[derive(Parser)]
#[command(name = "tonescore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score file to a WAV file
    Render {
        /// Path to the score file
        #[arg(short, long)]
        score: String,

        /// Output WAV path
        #[arg(short, long)]
        output: String,

        /// Session settings file (JSON)
        #[arg(long)]
        session: Option<String>,

        /// Tempo override
        #[arg(short, long)]
        tempo: Option<u32>,

        /// Noise seed override
        #[arg(long)]
        seed: Option<u32>,

        /// Render notes without the ADSR envelope
        #[arg(long)]
        no_envelope: bool,

        /// Apply the default delay if the session defines none
        #[arg(long)]
        delay: bool,

        /// Also write the score next to the WAV file
        #[arg(long)]
        save_score: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check that a score file parses and fits the render limit
    Validate {
        /// Path to the score file
        #[arg(short, long)]
        score: String,

        /// Session settings file (JSON) for tempo and score length
        #[arg(long)]
        session: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the notes of a score with frequencies and timings
    Inspect {
        /// Path to the score file
        #[arg(short, long)]
        score: String,

        /// Tempo used for timings
        #[arg(short, long, default_value_t = tonescore_engine::DEFAULT_TEMPO)]
        tempo: u32,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Shift every note of a score by a number of half steps
    Transpose {
        /// Path to the score file
        #[arg(short, long)]
        score: String,

        /// Half steps to shift by (negative shifts down)
        #[arg(long, allow_hyphen_values = true)]
        half_steps: i32,

        /// Output score path
        #[arg(short, long)]
        output: String,
    },

    /// Print the envelope outline for a session
    Envelope {
        /// Session settings file (JSON)
        #[arg(long)]
        session: Option<String>,

        /// Attack time in milliseconds
        #[arg(long)]
        attack: Option<f64>,

        /// Decay time in milliseconds
        #[arg(long)]
        decay: Option<f64>,

        /// Sustain level (0.0 to 1.0)
        #[arg(long)]
        sustain: Option<f64>,

        /// Release time in milliseconds
        #[arg(long)]
        release: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

/// Installs the log subscriber on stderr.
///
/// `-v` flags take precedence over `RUST_LOG`; without either only warnings
/// are shown.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Render {
            score,
            output,
            session,
            tempo,
            seed,
            no_envelope,
            delay,
            save_score,
            json,
        } => commands::render::run(&RenderOptions {
            score,
            output,
            session,
            tempo,
            seed,
            no_envelope,
            delay,
            save_score,
            json,
        }),
        Commands::Validate {
            score,
            session,
            json,
        } => commands::validate::run(&score, session.as_deref(), json),
        Commands::Inspect { score, tempo, json } => commands::inspect::run(&score, tempo, json),
        Commands::Transpose {
            score,
            half_steps,
            output,
        } => commands::transpose::run(&score, half_steps, &output),
        Commands::Envelope {
            session,
            attack,
            decay,
            sustain,
            release,
            json,
        } => commands::envelope::run(
            session.as_deref(),
            EnvelopeOverrides {
                attack_ms: attack,
                decay_ms: decay,
                sustain,
                release_ms: release,
            },
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
