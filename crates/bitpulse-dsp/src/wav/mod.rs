//! Mono 16-bit PCM WAV sink and source.
//!
//! The writer emits no timestamps or variable metadata, so identical
//! buffers produce byte-identical files; the BLAKE3 hash of the PCM chunk
//! is exposed for determinism checks.

mod format;
mod pcm;
mod result;
mod writer;


pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data, parse_wav, read_wav};
pub use result::WavResult;
pub use writer::{buffer_to_pcm16_bytes, write_wav, write_wav_to_vec};
