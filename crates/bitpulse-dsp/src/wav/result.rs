//! Finalized WAV output.

use std::path::Path;

use super::format::WavFormat;
use super::writer::{buffer_to_pcm16_bytes, write_wav_to_vec};
use crate::buffer::SignalBuffer;
use crate::error::DspResult;

/// A finalized WAV file ready for a durable write.
#[derive(Debug)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM chunk, for determinism checks.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes a signal buffer as a mono 16-bit WAV file.
    pub fn from_buffer(buffer: &SignalBuffer) -> Self {
        let pcm = buffer_to_pcm16_bytes(buffer);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let format = WavFormat::mono(buffer.sample_rate());
        let wav_data = write_wav_to_vec(&format, &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate: buffer.sample_rate(),
            num_samples: buffer.len(),
        }
    }

    /// Writes the WAV bytes to disk.
    pub fn write_to(&self, path: &Path) -> DspResult<()> {
        std::fs::write(path, &self.wav_data)?;
        Ok(())
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / f64::from(self.sample_rate)
    }
}
