//! WAV encoding and file output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::buffer::SampleBuffer;
use crate::error::{EngineError, EngineResult};

/// Size of the RIFF/fmt/data header in bytes.
const HEADER_LEN: usize = 44;

/// Mono 16-bit PCM format at a given sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
}

impl WavFormat {
    pub const CHANNELS: u16 = 1;
    pub const BITS_PER_SAMPLE: u16 = 16;

    pub fn mono(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Bytes per sample frame.
    pub fn block_align(&self) -> u16 {
        Self::CHANNELS * (Self::BITS_PER_SAMPLE / 8)
    }

    /// Bytes per second of audio.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

/// Builds the 44-byte header for `data_size` bytes of PCM.
pub fn wav_header(format: &WavFormat, data_size: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    let file_size = 36 + data_size;

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&file_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    header[22..24].copy_from_slice(&WavFormat::CHANNELS.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&WavFormat::BITS_PER_SAMPLE.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());
    header
}

/// Size field for a data chunk of `pcm_len` bytes.
///
/// `None` when the RIFF size (`36 + pcm_len`) does not fit in 32 bits.
pub fn data_chunk_size(pcm_len: usize) -> Option<u32> {
    u32::try_from(pcm_len)
        .ok()
        .filter(|&size| size <= u32::MAX - (HEADER_LEN as u32 - 8))
}

/// Writes a complete WAV stream.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = data_chunk_size(pcm_data.len()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} bytes of PCM exceed the WAV size limit", pcm_data.len()),
        )
    })?;
    writer.write_all(&wav_header(format, data_size))?;
    writer.write_all(pcm_data)
}

/// Encodes a complete WAV file in memory.
pub fn encode_wav(format: &WavFormat, pcm_data: &[u8]) -> EngineResult<Vec<u8>> {
    let data_size = data_chunk_size(pcm_data.len()).ok_or_else(|| {
        EngineError::invalid_param(
            "pcm_data",
            format!("{} bytes exceed the WAV size limit", pcm_data.len()),
        )
    })?;
    let mut out = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    out.extend_from_slice(&wav_header(format, data_size));
    out.extend_from_slice(pcm_data);
    Ok(out)
}

/// Converts samples to little-endian 16-bit PCM, clipping to [-1, 1].
pub fn samples_to_pcm16(samples: &[f64]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

/// An encoded render.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload.
    pub pcm_hash: String,
    pub sample_rate: u32,
    pub num_samples: usize,
}

impl WavResult {
    pub fn from_samples(samples: &[f64], sample_rate: u32) -> EngineResult<Self> {
        let pcm = samples_to_pcm16(samples);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = encode_wav(&WavFormat::mono(sample_rate), &pcm)?;

        Ok(Self {
            wav_data,
            pcm_hash,
            sample_rate,
            num_samples: samples.len(),
        })
    }

    pub fn from_buffer(buffer: &SampleBuffer) -> EngineResult<Self> {
        Self::from_samples(buffer.samples(), buffer.sample_rate())
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / self.sample_rate as f64
    }
}

/// Encodes `buffer` and writes it to `path`.
///
/// Errors from any stage of the write, including the final flush, name the
/// path.
pub fn write_wav_file(path: &Path, buffer: &SampleBuffer) -> EngineResult<WavResult> {
    let result = WavResult::from_buffer(buffer)?;

    let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&result.wav_data)
        .map_err(|e| EngineError::io(path, e))?;
    writer.flush().map_err(|e| EngineError::io(path, e))?;

    Ok(result)
}
