//! Tests for the WAV writer.

use tonescore_score::WaveKind;

use super::*;
use crate::buffer::SampleBuffer;

#[test]
fn test_header_layout() {
    let header = wav_header(&WavFormat::mono(11250), 200);

    assert_eq!(&header[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes(header[4..8].try_into().unwrap()), 236);
    assert_eq!(&header[8..12], b"WAVE");
    assert_eq!(u16::from_le_bytes([header[22], header[23]]), 1);
    assert_eq!(u32::from_le_bytes(header[24..28].try_into().unwrap()), 11250);
    assert_eq!(u32::from_le_bytes(header[28..32].try_into().unwrap()), 22500);
    assert_eq!(u16::from_le_bytes([header[34], header[35]]), 16);
    assert_eq!(&header[36..40], b"data");
    assert_eq!(u32::from_le_bytes(header[40..44].try_into().unwrap()), 200);
}

#[test]
fn test_pcm16_conversion_clips() {
    let pcm = samples_to_pcm16(&[0.0, 1.0, -1.0, 2.0, 0.5]);
    let values: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(values, vec![0, 32767, -32767, 32767, 16384]);
}

#[test]
fn test_write_wav_matches_encode() {
    let pcm = samples_to_pcm16(&[0.1, 0.2, 0.3]);
    let format = WavFormat::mono(8000);

    let mut streamed = Vec::new();
    write_wav(&mut streamed, &format, &pcm).unwrap();

    assert_eq!(streamed, encode_wav(&format, &pcm).unwrap());
    assert_eq!(streamed.len(), 44 + 6);
}

#[test]
fn test_pcm_hash_matches_result() {
    let buffer = SampleBuffer::new(vec![0.25; 100], WaveKind::Constant, 0.0, 0.25, 11250);
    let result = WavResult::from_buffer(&buffer).unwrap();

    assert_eq!(result.num_samples, 100);
    assert_eq!(extract_pcm_data(&result.wav_data).unwrap().len(), 200);
    assert_eq!(compute_pcm_hash(&result.wav_data).unwrap(), result.pcm_hash);
    assert!((result.duration_seconds() - 100.0 / 11250.0).abs() < 1e-12);
}

#[test]
fn test_extract_rejects_garbage() {
    assert!(extract_pcm_data(b"not a wav file at all, clearly").is_none());
    assert!(extract_pcm_data(&[]).is_none());
}

#[test]
fn test_identical_samples_identical_hash() {
    let a = WavResult::from_samples(&[0.1, -0.1], 11250).unwrap();
    let b = WavResult::from_samples(&[0.1, -0.1], 11250).unwrap();
    let c = WavResult::from_samples(&[0.1, 0.1], 11250).unwrap();
    assert_eq!(a.pcm_hash, b.pcm_hash);
    assert_ne!(a.pcm_hash, c.pcm_hash);
}

#[test]
fn test_data_chunk_size_limit() {
    assert_eq!(data_chunk_size(200), Some(200));
    assert_eq!(data_chunk_size(u32::MAX as usize - 36), Some(u32::MAX - 36));
    assert_eq!(data_chunk_size(u32::MAX as usize - 35), None);
    assert_eq!(data_chunk_size(u32::MAX as usize), None);
}
