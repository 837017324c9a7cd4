//! Inspect command implementation
//!
//! Prints a score as a table with frequencies and timings.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tonescore_engine::config::{eighth_note_seconds, validate_tempo};
use tonescore_score::{format, Note};

use super::json_output::InspectOutput;

/// One row of the note table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRow {
    pub index: usize,
    pub pitch: String,
    pub frequency: f64,
    pub velocity: f64,
    pub start: u32,
    pub length: u32,
    pub wave: String,
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

/// Builds the table rows for `notes` at `tempo`.
pub fn note_rows(notes: &[Note], tempo: u32) -> Vec<NoteRow> {
    let eighth = eighth_note_seconds(tempo);
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| NoteRow {
            index,
            pitch: note.pitch().to_string(),
            frequency: note.frequency(),
            velocity: note.velocity(),
            start: note.start(),
            length: note.length(),
            wave: note.wave().to_string(),
            start_seconds: note.start() as f64 * eighth,
            duration_seconds: note.length() as f64 * eighth,
        })
        .collect()
}

/// Run the inspect command
pub fn run(score_path: &str, tempo: u32, json_output: bool) -> Result<ExitCode> {
    validate_tempo(tempo)?;
    let notes = format::read_score_file(Path::new(score_path))
        .with_context(|| format!("Failed to load score file: {}", score_path))?;
    let rows = note_rows(&notes, tempo);

    if json_output {
        let output = InspectOutput {
            score: score_path.to_string(),
            tempo,
            notes: rows,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} (tempo {})",
        "Inspecting:".cyan().bold(),
        score_path,
        tempo
    );
    println!(
        "{}",
        format!(
            "{:>4}  {:<5} {:>9}  {:>5}  {:>5}  {:>6}  {:<8}  {:>8}",
            "#", "pitch", "Hz", "vel", "start", "length", "wave", "at (s)"
        )
        .dimmed()
    );
    for row in &rows {
        println!(
            "{:>4}  {:<5} {:>9.2}  {:>5.2}  {:>5}  {:>6}  {:<8}  {:>8.3}",
            row.index,
            row.pitch,
            row.frequency,
            row.velocity,
            row.start,
            row.length,
            row.wave,
            row.start_seconds
        );
    }
    println!("{} {} notes", "Total:".green().bold(), rows.len());

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonescore_score::WaveKind;

    #[test]
    fn test_rows_use_tempo() {
        let notes = vec![
            Note::from_name("A4", 0.5, 4, 2, WaveKind::Sine).unwrap(),
            Note::from_name("A2", 1.0, 0, 1, WaveKind::Square).unwrap(),
        ];
        let rows = note_rows(&notes, 150);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pitch, "A4");
        assert_eq!(rows[0].frequency, 440.0);
        assert!((rows[0].start_seconds - 0.8).abs() < 1e-12);
        assert!((rows[0].duration_seconds - 0.4).abs() < 1e-12);
        assert_eq!(rows[1].wave, "Square");
        assert_eq!(rows[1].frequency, 110.0);
    }

    #[test]
    fn test_zero_tempo_rejected() {
        assert!(run("whatever.txt", 0, false).is_err());
    }
}
