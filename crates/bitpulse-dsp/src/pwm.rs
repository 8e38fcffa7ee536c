//! Pulse-width encoding against a sawtooth carrier.

use crate::buffer::{SampleKind, SignalBuffer};
use crate::chain::TransformStage;
use crate::error::{DspError, DspResult};

/// Stateless 2-level pulse-width encoder.
///
/// The carrier is a sawtooth ramping from -1.0 to +1.0 over each carrier
/// period; the output is +1.0 wherever the input is strictly above the
/// carrier and -1.0 elsewhere. The carrier period is derived from the
/// input length, so the whole buffer spans `sample_length` carrier cycles
/// (subject to integer division).
#[derive(Debug, Clone)]
pub struct PwmEncoder {
    sample_length: usize,
}

impl PwmEncoder {
    /// Default carrier sample length.
    pub const DEFAULT_SAMPLE_LENGTH: usize = 16;

    /// Creates an encoder with the given carrier sample length.
    pub fn new(sample_length: usize) -> DspResult<Self> {
        if sample_length == 0 {
            return Err(DspError::InvalidSampleLength {
                length: sample_length,
            });
        }
        Ok(Self { sample_length })
    }

    /// Configured carrier sample length.
    pub fn sample_length(&self) -> usize {
        self.sample_length
    }
}

impl Default for PwmEncoder {
    fn default() -> Self {
        Self {
            sample_length: Self::DEFAULT_SAMPLE_LENGTH,
        }
    }
}

impl TransformStage for PwmEncoder {
    fn apply(&mut self, input: SignalBuffer) -> DspResult<SignalBuffer> {
        if input.is_empty() {
            return Ok(input.retagged(Vec::new(), SampleKind::Float));
        }

        let period = (input.len() / self.sample_length).max(1);
        let encoded = input
            .samples()
            .iter()
            .enumerate()
            .map(|(t, &x)| {
                // A single-sample period has no room to ramp; the carrier
                // degenerates to a constant 0.0 so the comparison reduces
                // to the sign of the input.
                let carrier = if period == 1 {
                    0.0
                } else {
                    2.0 * (t % period) as f64 / period as f64 - 1.0
                };
                if x > carrier {
                    1.0
                } else {
                    -1.0
                }
            })
            .collect();

        Ok(input.retagged(encoded, SampleKind::Float))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(samples: Vec<f64>) -> SignalBuffer {
        SignalBuffer::from_samples(samples, 48000).unwrap()
    }

    #[test]
    fn test_zero_sample_length_rejected() {
        let err = PwmEncoder::new(0).unwrap_err();
        assert!(matches!(err, DspError::InvalidSampleLength { length: 0 }));
    }

    #[test]
    fn test_default_sample_length() {
        assert_eq!(PwmEncoder::default().sample_length(), 16);
    }

    #[test]
    fn test_degenerate_period_uses_constant_zero_carrier() {
        // Four samples with sample_length 4 gives period max(1, 4/4) = 1,
        // so the carrier sits at 0.0 everywhere. The strict comparison
        // sends 0.0 itself to -1.0.
        let mut encoder = PwmEncoder::new(4).unwrap();
        let output = encoder.apply(buffer(vec![0.0, 0.5, -0.5, 0.9])).unwrap();
        assert_eq!(output.samples(), &[-1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_input_shorter_than_sample_length_uses_zero_carrier() {
        // 3 samples against the default length 16 also collapses the
        // period to 1, so the output is the sign of each sample.
        let mut encoder = PwmEncoder::default();
        let output = encoder.apply(buffer(vec![0.3, -0.3, 0.0])).unwrap();
        assert_eq!(output.samples(), &[1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_output_length_matches_input() {
        let mut encoder = PwmEncoder::default();
        for len in [1, 15, 16, 17, 1000] {
            let input: Vec<f64> = (0..len).map(|i| (i as f64 * 0.37).sin()).collect();
            let output = encoder.apply(buffer(input)).unwrap();
            assert_eq!(output.len(), len, "input length {len}");
        }
    }

    #[test]
    fn test_output_is_strictly_two_level() {
        let mut encoder = PwmEncoder::default();
        let input: Vec<f64> = (0..640).map(|i| (i as f64 * 0.05).sin()).collect();
        let output = encoder.apply(buffer(input)).unwrap();
        assert!(output.samples().iter().all(|&s| s == 1.0 || s == -1.0));
    }

    #[test]
    fn test_duty_cycle_follows_amplitude() {
        // A high constant level stays above the ramping carrier for most of
        // each period, a low level for little of it.
        let mut encoder = PwmEncoder::new(16).unwrap();
        let high = encoder.apply(buffer(vec![0.8; 1600])).unwrap();
        let low = encoder.apply(buffer(vec![-0.8; 1600])).unwrap();

        let count_high = |b: &SignalBuffer| b.samples().iter().filter(|&&s| s == 1.0).count();
        assert!(count_high(&high) > 1300, "got {}", count_high(&high));
        assert!(count_high(&low) < 300, "got {}", count_high(&low));
    }

    #[test]
    fn test_empty_input() {
        let mut encoder = PwmEncoder::default();
        let output = encoder.apply(buffer(Vec::new())).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_stateless_across_calls() {
        let mut encoder = PwmEncoder::default();
        let input: Vec<f64> = (0..320).map(|i| (i as f64 * 0.11).cos()).collect();
        let first = encoder.apply(buffer(input.clone())).unwrap();
        let second = encoder.apply(buffer(input)).unwrap();
        assert_eq!(first.samples(), second.samples());
    }
}
