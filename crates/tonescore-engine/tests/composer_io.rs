//! Composer file handling: scores, sessions and WAV output.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tonescore_engine::wav::compute_pcm_hash;
use tonescore_engine::{Composer, EngineConfig, EngineError, SessionConfig};
use tonescore_score::{CodedError, DelayParams, Note, ScoreError, WaveKind};

fn composer() -> Composer {
    let mut composer = Composer::new(EngineConfig {
        total_eighth_notes: 8,
        seed: 7,
        ..EngineConfig::default()
    });
    composer.add_note(Note::from_name("C4", 0.5, 0, 2, WaveKind::Sine).unwrap());
    composer.add_note(Note::from_name("Eb4", 0.25, 2, 2, WaveKind::Square).unwrap());
    composer.add_note(Note::from_name("G4", 0.125, 4, 4, WaveKind::Noise).unwrap());
    composer
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("score.txt");

    let original = composer();
    original.save_score(&path).unwrap();

    let mut loaded = Composer::default();
    loaded.load_score(&path).unwrap();

    assert_eq!(loaded.notes(), original.notes());
}

#[test]
fn failed_load_keeps_existing_notes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.txt");
    fs::write(
        &path,
        "N:C4|V:1.0|S:0|L:1|W:Sine\nN:C4|V:1.0|S:0|L:1|W:Sine|X:1\n",
    )
    .unwrap();

    let mut target = composer();
    let before = target.notes().to_vec();

    let err = target.load_score(&path).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Score(ScoreError::Parse { line: 2, .. })
    ));
    assert_eq!(err.code(), "SCORE_003");
    assert_eq!(target.notes(), before.as_slice());

    let missing = target.load_score(&dir.path().join("missing.txt")).unwrap_err();
    assert!(missing.to_string().contains("missing.txt"));
    assert_eq!(target.notes(), before.as_slice());
}

#[test]
fn wav_output_is_readable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.wav");

    let mut composer = composer();
    composer.set_delay(Some(DelayParams::default())).unwrap();
    let result = composer.render_to_wav(&path).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 11250);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 8 * 3375);
    assert_eq!(samples.len(), result.num_samples);
    assert!(samples.iter().any(|&s| s != 0));

    let bytes = fs::read(&path).unwrap();
    assert_eq!(compute_pcm_hash(&bytes).unwrap(), result.pcm_hash);
}

#[test]
fn renders_are_reproducible() {
    let a = composer().render().unwrap();
    let b = composer().render().unwrap();
    assert_eq!(a, b);
}

#[test]
fn unwritable_wav_path_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.wav");

    let err = composer().render_to_wav(&path).unwrap_err();
    assert!(matches!(err, EngineError::Io { .. }));
    assert!(err.to_string().contains("no-such-dir"));
}

#[test]
fn session_file_drives_composer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(
        &path,
        r#"{
            "tempo": 200,
            "apply_envelope": false,
            "delay": { "delay_time_ms": 50.0, "repetitions": 2 },
            "engine": { "total_eighth_notes": 16 }
        }"#,
    )
    .unwrap();

    let session = SessionConfig::from_json_file(&path).unwrap();
    let composer = Composer::from_session(&session).unwrap();

    assert_eq!(composer.tempo(), 200);
    assert!(!composer.applies_envelope());
    assert_eq!(composer.delay().unwrap().repetitions, 2);
    assert_eq!(composer.config().total_eighth_notes, 16);
    assert_eq!(composer.config().sample_rate, 11250);

    // 16 eighths at 0.15 s each.
    assert_eq!(composer.render().unwrap().len(), 27000);
}
