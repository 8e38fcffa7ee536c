//! WAV file format parameters.

/// WAV format parameters. The pipeline is single-channel 16-bit PCM
/// throughout, so only the sample rate varies.
#[derive(Debug, Clone, Copy)]
pub struct WavFormat {
    /// Number of channels (always 1 here).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (always 16 here).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates a mono 16-bit format at the given sample rate.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Bytes per sample (per channel).
    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Block align (bytes per sample frame).
    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Byte rate (bytes per second).
    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}
