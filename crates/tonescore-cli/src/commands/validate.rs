//! Validate command implementation
//!
//! Parses a score file and reports the first problem, if any. Note positions
//! are checked against the session's score length and render limit.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use tonescore_engine::SessionConfig;
use tonescore_score::{format, Note};

use super::json_output::{warning_codes, JsonError, JsonWarning, ValidateOutput};
use super::load_session;

/// Checks the notes of a parsed score against `session`.
///
/// Returns the first note that cannot be rendered as an error, and a warning
/// for every note that ends after the score length.
pub fn check_notes(
    notes: &[Note],
    session: &SessionConfig,
) -> (Option<JsonError>, Vec<JsonWarning>) {
    let total = session.engine.total_eighth_notes;
    let mut warnings = Vec::new();

    for (idx, note) in notes.iter().enumerate() {
        if let Err(e) = session
            .engine
            .checked_grid_to_samples(note.end(), session.tempo)
        {
            let mut error = JsonError::from_coded(&e);
            error.message = format!("note {} ({}): {}", idx + 1, note.pitch(), error.message);
            return (Some(error), warnings);
        }
        if note.end() > total {
            warnings.push(
                JsonWarning::new(
                    warning_codes::PAST_SCORE_END,
                    format!(
                        "note {} ({}) runs past eighth {}",
                        idx + 1,
                        note.pitch(),
                        total
                    ),
                )
                .with_note(idx),
            );
        }
    }

    (None, warnings)
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if the score parses and fits the render limit, 1 otherwise
pub fn run(score_path: &str, session_path: Option<&str>, json_output: bool) -> Result<ExitCode> {
    let session = load_session(session_path)?;
    let output = match format::read_score_file(Path::new(score_path)) {
        Ok(notes) => match check_notes(&notes, &session) {
            (None, warnings) => ValidateOutput::success(score_path, notes.len(), warnings),
            (Some(error), warnings) => ValidateOutput::failure(score_path, vec![error], warnings),
        },
        Err(e) => {
            ValidateOutput::failure(score_path, vec![JsonError::from_score_error(&e)], vec![])
        }
    };

    let code = if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(code);
    }

    println!("{} {}", "Validating:".cyan().bold(), score_path);
    for warning in &output.warnings {
        println!("  {} {}", "!".yellow(), warning.message);
    }
    match (&output.notes, output.errors.first()) {
        (Some(count), None) => println!("{} {} notes", "Valid:".green().bold(), count),
        (_, Some(error)) => println!(
            "{} [{}] {}",
            "Invalid:".red().bold(),
            error.code,
            error.message
        ),
        (None, None) => {}
    }

    Ok(code)
}
