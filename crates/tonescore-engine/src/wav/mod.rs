//! Deterministic WAV output.
//!
//! Buffers are written as mono 16-bit PCM with a bare RIFF header and no
//! metadata chunks, so identical samples always give identical files. The
//! BLAKE3 hash of the PCM payload identifies a render independently of the
//! container.

mod pcm;
mod writer;

#[cfg(test)]
mod tests;

pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use writer::{
    data_chunk_size, encode_wav, samples_to_pcm16, wav_header, write_wav, write_wav_file,
    WavFormat, WavResult,
};
