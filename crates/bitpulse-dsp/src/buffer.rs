//! Normalized sample buffers, the common currency between pipeline stages.

use crate::error::{DspError, DspResult};

/// How the samples entered the pipeline.
///
/// Decided once at ingestion and consulted at egress, so stages never have
/// to inspect payload types at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Samples arrived as floats, nominally already in [-1.0, 1.0].
    Float,
    /// Samples arrived as signed 16-bit PCM and were normalized by 1/32768.
    Pcm16,
}

/// A bounded-amplitude sample sequence plus its sample rate.
///
/// Every sample is clipped to [-1.0, 1.0] on construction, so stages can
/// rely on that invariant for their input. Each stage consumes one buffer
/// and produces a new one; the sample rate never changes mid-pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
    kind: SampleKind,
}

impl SignalBuffer {
    /// Creates a buffer from float samples. Values outside [-1.0, 1.0] are
    /// clipped.
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> DspResult<Self> {
        Self::with_kind(samples, sample_rate, SampleKind::Float)
    }

    /// Creates a buffer from signed 16-bit PCM, normalizing by 1/32768.
    pub fn from_pcm16(samples: &[i16], sample_rate: u32) -> DspResult<Self> {
        let normalized = samples.iter().map(|&s| f64::from(s) / 32768.0).collect();
        Self::with_kind(normalized, sample_rate, SampleKind::Pcm16)
    }

    fn with_kind(mut samples: Vec<f64>, sample_rate: u32, kind: SampleKind) -> DspResult<Self> {
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate { rate: sample_rate });
        }
        for sample in &mut samples {
            *sample = sample.clamp(-1.0, 1.0);
        }
        Ok(Self {
            samples,
            sample_rate,
            kind,
        })
    }

    /// Rebuilds a buffer around transformed samples, keeping the sample rate
    /// but retagging the representation. Used by stages to produce their
    /// output; samples are clipped to keep the amplitude invariant.
    pub(crate) fn retagged(&self, mut samples: Vec<f64>, kind: SampleKind) -> Self {
        for sample in &mut samples {
            *sample = sample.clamp(-1.0, 1.0);
        }
        Self {
            samples,
            sample_rate: self.sample_rate,
            kind,
        }
    }

    /// The normalized samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Representation tag decided at ingestion.
    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Egress conversion to signed 16-bit PCM: multiply by 32767, clip,
    /// round. Together with [`SignalBuffer::from_pcm16`] this round-trips
    /// PCM input within one quantization step.
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0).round() as i16)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_samples_clips_to_unit_range() {
        let buffer = SignalBuffer::from_samples(vec![-2.0, -0.5, 0.0, 0.5, 2.0], 44100).unwrap();
        assert_eq!(buffer.samples(), &[-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(buffer.kind(), SampleKind::Float);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let err = SignalBuffer::from_samples(vec![0.0], 0).unwrap_err();
        assert!(matches!(err, crate::DspError::InvalidSampleRate { rate: 0 }));
    }

    #[test]
    fn test_pcm16_normalization() {
        let buffer = SignalBuffer::from_pcm16(&[-32768, 0, 16384], 48000).unwrap();
        assert_eq!(buffer.samples(), &[-1.0, 0.0, 0.5]);
        assert_eq!(buffer.kind(), SampleKind::Pcm16);
    }

    #[test]
    fn test_pcm16_round_trip_within_one_step() {
        let original: Vec<i16> = vec![-32768, -1000, -1, 0, 1, 1000, 32767];
        let buffer = SignalBuffer::from_pcm16(&original, 48000).unwrap();
        let restored = buffer.to_pcm16();
        for (a, b) in original.iter().zip(&restored) {
            assert!((i32::from(*a) - i32::from(*b)).abs() <= 1, "{a} vs {b}");
        }
    }

    #[test]
    fn test_duration() {
        let buffer = SignalBuffer::from_samples(vec![0.0; 48000], 96000).unwrap();
        assert!((buffer.duration_seconds() - 0.5).abs() < 1e-12);
    }
}
