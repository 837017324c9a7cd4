//! Transpose command implementation

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use tonescore_engine::Composer;

/// Run the transpose command
///
/// Shifts every note of `score_path` by `half_steps` and writes the result to
/// `output_path`. Nothing is written if any note would leave the pitch range.
pub fn run(score_path: &str, half_steps: i32, output_path: &str) -> Result<ExitCode> {
    let mut composer = Composer::default();
    composer
        .load_score(Path::new(score_path))
        .with_context(|| format!("Failed to load score file: {}", score_path))?;
    composer
        .transpose(half_steps)
        .with_context(|| format!("Cannot transpose by {} half steps", half_steps))?;
    composer
        .save_score(Path::new(output_path))
        .with_context(|| format!("Failed to write score file: {}", output_path))?;

    println!(
        "{} {} notes by {:+} half steps -> {}",
        "Transposed:".green().bold(),
        composer.notes().len(),
        half_steps,
        output_path
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_transpose_across_octave() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.txt");
        let output = tmp.path().join("out.txt");
        fs::write(&input, "N:B4|V:1.0|S:0|L:1|W:Sine\nN:C4|V:0.5|S:1|L:2|W:Square\n").unwrap();

        let code = run(input.to_str().unwrap(), 1, output.to_str().unwrap()).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "N:C5|V:1.0|S:0|L:1|W:Sine\nN:Db4|V:0.5|S:1|L:2|W:Square\n"
        );
    }

    #[test]
    fn test_out_of_range_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in.txt");
        let output = tmp.path().join("out.txt");
        fs::write(&input, "N:C0|V:1.0|S:0|L:1|W:Sine\n").unwrap();

        assert!(run(input.to_str().unwrap(), -1, output.to_str().unwrap()).is_err());
        assert!(!output.exists());
    }
}
