//! Noise streams.
//!
//! Noise is the only source of randomness in a render. Each note draws from
//! its own PCG32 stream keyed by the session seed and the note's position in
//! the score, so the mix does not depend on the order note renders finish in.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// BLAKE3 key-derivation context for note streams.
const NOTE_STREAM_CONTEXT: &str = "tonescore note noise stream v1";

/// A PCG32 generator for a single 32-bit seed.
pub fn create_rng(seed: u32) -> Pcg32 {
    Pcg32::seed_from_u64(u64::from(seed))
}

/// 64-bit seed of the noise stream for the note at `note_index`.
pub fn note_stream_seed(session_seed: u32, note_index: u32) -> u64 {
    let mut hasher = blake3::Hasher::new_derive_key(NOTE_STREAM_CONTEXT);
    hasher.update(&session_seed.to_le_bytes());
    hasher.update(&note_index.to_le_bytes());

    let mut seed = [0u8; 8];
    hasher.finalize_xof().fill(&mut seed);
    u64::from_le_bytes(seed)
}

/// The noise generator for one note of a score.
pub fn create_note_rng(session_seed: u32, note_index: u32) -> Pcg32 {
    Pcg32::seed_from_u64(note_stream_seed(session_seed, note_index))
}
