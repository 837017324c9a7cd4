//! Score text format.
//!
//! One note per line:
//!
//! ```text
//! N:<pitch><octave>|V:<velocity>|S:<start>|L:<length>|W:<wave>
//! ```
//!
//! Lines starting with `#` are comments and blank lines are ignored. The
//! format is strict: exactly five fields, in this order, with these keys.
//! Loading is all-or-nothing; the first malformed line aborts the parse.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ScoreError, ScoreResult};
use crate::note::Note;
use crate::pitch::Pitch;
use crate::wave::WaveKind;

const FIELD_KEYS: [&str; 5] = ["N", "V", "S", "L", "W"];

/// Parses a single note line. `line_no` is 1-based and used in errors.
pub fn parse_note_line(line: &str, line_no: usize) -> ScoreResult<Note> {
    let fields: Vec<&str> = line.trim().split('|').collect();
    if fields.len() != FIELD_KEYS.len() {
        return Err(ScoreError::parse(
            line_no,
            format!(
                "expected {} fields, found {}",
                FIELD_KEYS.len(),
                fields.len()
            ),
        ));
    }

    let mut values = [""; 5];
    for (i, (field, key)) in fields.iter().zip(FIELD_KEYS).enumerate() {
        let (found, value) = field.split_once(':').ok_or_else(|| {
            ScoreError::parse(line_no, format!("field {} is missing ':'", i + 1))
        })?;
        if found != key {
            return Err(ScoreError::parse(
                line_no,
                format!("field {} should be '{}', found '{}'", i + 1, key, found),
            ));
        }
        values[i] = value;
    }

    let pitch: Pitch = values[0]
        .parse()
        .map_err(|e: ScoreError| ScoreError::parse(line_no, e.to_string()))?;
    let velocity: f64 = values[1].parse().map_err(|_| {
        ScoreError::parse(line_no, format!("invalid velocity '{}'", values[1]))
    })?;
    let start: u32 = values[2]
        .parse()
        .map_err(|_| ScoreError::parse(line_no, format!("invalid start '{}'", values[2])))?;
    let length: u32 = values[3]
        .parse()
        .map_err(|_| ScoreError::parse(line_no, format!("invalid length '{}'", values[3])))?;
    let wave: WaveKind = values[4]
        .parse()
        .map_err(|e: ScoreError| ScoreError::parse(line_no, e.to_string()))?;

    Note::new(pitch, velocity, start, length, wave)
        .map_err(|e| ScoreError::parse(line_no, e.to_string()))
}

/// Parses a whole score, skipping comments and blank lines.
pub fn parse_score(text: &str) -> ScoreResult<Vec<Note>> {
    let mut notes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        notes.push(parse_note_line(trimmed, idx + 1)?);
    }
    Ok(notes)
}

/// Serializes notes, one line each, in order.
pub fn write_score(notes: &[Note]) -> String {
    let mut out = String::new();
    for note in notes {
        out.push_str(&note.to_string());
        out.push('\n');
    }
    out
}

/// Reads and parses a score file.
pub fn read_score_file(path: &Path) -> ScoreResult<Vec<Note>> {
    let text = fs::read_to_string(path).map_err(|e| ScoreError::io(path, e))?;
    parse_score(&text)
}

/// Writes a score file, replacing any existing content.
pub fn write_score_file(path: &Path, notes: &[Note]) -> ScoreResult<()> {
    let file = fs::File::create(path).map_err(|e| ScoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(write_score(notes).as_bytes())
        .map_err(|e| ScoreError::io(path, e))?;
    writer.flush().map_err(|e| ScoreError::io(path, e))?;
    Ok(())
}
