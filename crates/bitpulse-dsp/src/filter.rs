//! Butterworth lowpass filtering with zero-phase application.
//!
//! Coefficient design is a pure function of the order and the cutoff as a
//! fraction of Nyquist: an order-N Butterworth is realized as a cascade of
//! Audio EQ Cookbook biquad sections with the classic Butterworth pole Qs,
//! plus a bilinear-transform one-pole section for odd orders. The filtering
//! loop applies the cascade forward and then backward over the reversed
//! signal, cancelling phase shift at the cost of doubling the effective
//! order.

use std::f64::consts::PI;

use crate::buffer::SignalBuffer;
use crate::chain::TransformStage;
use crate::error::{DspError, DspResult};

/// Biquad lowpass coefficients, normalized so `a0 = 1`.
#[derive(Debug, Clone, Copy)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Cookbook lowpass coefficients.
    ///
    /// # Arguments
    /// * `normalized_cutoff` - Cutoff as a fraction of Nyquist, in (0, 1)
    /// * `q` - Section Q factor
    pub fn lowpass(normalized_cutoff: f64, q: f64) -> Self {
        // Clamp Q to minimum safe value to prevent division by zero
        let q = q.max(0.5);
        let omega = PI * normalized_cutoff;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 - cos_omega) / 2.0;
        let b1 = 1.0 - cos_omega;
        let b2 = (1.0 - cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// First-order lowpass coefficients from the bilinear transform, used as
/// the real-pole section of odd-order cascades.
#[derive(Debug, Clone, Copy)]
pub struct OnePoleCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub a1: f64,
}

impl OnePoleCoeffs {
    /// Lowpass coefficients for a cutoff expressed as a fraction of Nyquist.
    pub fn lowpass(normalized_cutoff: f64) -> Self {
        // Prewarped analog cutoff.
        let c = (PI * normalized_cutoff / 2.0).tan();
        let a0 = 1.0 + c;
        Self {
            b0: c / a0,
            b1: c / a0,
            a1: (c - 1.0) / a0,
        }
    }
}

/// One section of a filter cascade, with its delay-line state.
#[derive(Debug, Clone)]
enum Section {
    Biquad {
        coeffs: BiquadCoeffs,
        x1: f64,
        x2: f64,
        y1: f64,
        y2: f64,
    },
    OnePole {
        coeffs: OnePoleCoeffs,
        x1: f64,
        y1: f64,
    },
}

impl Section {
    fn biquad(coeffs: BiquadCoeffs) -> Self {
        Self::Biquad {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn one_pole(coeffs: OnePoleCoeffs) -> Self {
        Self::OnePole {
            coeffs,
            x1: 0.0,
            y1: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        match self {
            Self::Biquad {
                coeffs,
                x1,
                x2,
                y1,
                y2,
            } => {
                let output = coeffs.b0 * input + coeffs.b1 * *x1 + coeffs.b2 * *x2
                    - coeffs.a1 * *y1
                    - coeffs.a2 * *y2;
                *x2 = *x1;
                *x1 = input;
                *y2 = *y1;
                *y1 = output;
                output
            }
            Self::OnePole { coeffs, x1, y1 } => {
                let output = coeffs.b0 * input + coeffs.b1 * *x1 - coeffs.a1 * *y1;
                *x1 = input;
                *y1 = output;
                output
            }
        }
    }
}

/// Butterworth pole Q values for the second-order sections of an order-`n`
/// cascade. Odd orders contribute one real pole, handled separately.
fn butterworth_section_qs(order: usize) -> Vec<f64> {
    let n = order as f64;
    (0..order / 2)
        .map(|k| {
            let theta = if order % 2 == 0 {
                PI * (2 * k + 1) as f64 / (2.0 * n)
            } else {
                PI * (k + 1) as f64 / n
            };
            1.0 / (2.0 * theta.cos())
        })
        .collect()
}

/// Designs an order-`order` Butterworth lowpass cascade with fresh state.
fn design_lowpass(order: usize, normalized_cutoff: f64) -> Vec<Section> {
    let mut sections = Vec::with_capacity(order / 2 + order % 2);
    if order % 2 == 1 {
        sections.push(Section::one_pole(OnePoleCoeffs::lowpass(normalized_cutoff)));
    }
    for q in butterworth_section_qs(order) {
        sections.push(Section::biquad(BiquadCoeffs::lowpass(normalized_cutoff, q)));
    }
    sections
}

/// Runs one pass of the cascade over the samples in place.
fn run_cascade(sections: &mut [Section], samples: &mut [f64]) {
    for sample in samples.iter_mut() {
        let mut value = *sample;
        for section in sections.iter_mut() {
            value = section.process(value);
        }
        *sample = value;
    }
}

/// Bidirectional band-limiting lowpass stage.
///
/// Stateless apart from its configuration: each `apply` designs a fresh
/// cascade for the buffer's sample rate, so one instance can serve buffers
/// at different rates.
#[derive(Debug, Clone)]
pub struct LowpassFilter {
    cutoff_hz: f64,
    order: usize,
}

impl LowpassFilter {
    /// Default filter order.
    pub const DEFAULT_ORDER: usize = 5;

    /// Creates a lowpass filter with the given cutoff and order.
    pub fn new(cutoff_hz: f64, order: usize) -> DspResult<Self> {
        if !(cutoff_hz > 0.0) {
            return Err(DspError::InvalidCutoff { cutoff: cutoff_hz });
        }
        if order == 0 {
            return Err(DspError::InvalidOrder { order });
        }
        Ok(Self { cutoff_hz, order })
    }

    /// Creates a lowpass filter with the default order.
    pub fn with_cutoff(cutoff_hz: f64) -> DspResult<Self> {
        Self::new(cutoff_hz, Self::DEFAULT_ORDER)
    }

    /// Configured cutoff frequency in Hz.
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Configured filter order.
    pub fn order(&self) -> usize {
        self.order
    }
}

impl TransformStage for LowpassFilter {
    fn apply(&mut self, input: SignalBuffer) -> DspResult<SignalBuffer> {
        if input.is_empty() {
            let kind = input.kind();
            return Ok(input.retagged(Vec::new(), kind));
        }

        let nyquist = f64::from(input.sample_rate()) / 2.0;
        if self.cutoff_hz >= nyquist {
            return Err(DspError::CutoffAboveNyquist {
                cutoff: self.cutoff_hz,
                nyquist,
            });
        }
        let normalized_cutoff = self.cutoff_hz / nyquist;

        let mut samples = input.samples().to_vec();

        // Forward pass.
        let mut sections = design_lowpass(self.order, normalized_cutoff);
        run_cascade(&mut sections, &mut samples);

        // Backward pass over the reversed signal with fresh section state;
        // the two passes cancel each other's phase shift exactly.
        samples.reverse();
        let mut sections = design_lowpass(self.order, normalized_cutoff);
        run_cascade(&mut sections, &mut samples);
        samples.reverse();

        let kind = input.kind();
        Ok(input.retagged(samples, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SampleKind;
    use pretty_assertions::assert_eq;

    fn buffer(samples: Vec<f64>, rate: u32) -> SignalBuffer {
        SignalBuffer::from_samples(samples, rate).unwrap()
    }

    /// Mean squared amplitude, for comparing signal energy.
    fn power(samples: &[f64]) -> f64 {
        samples.iter().map(|&s| s * s).sum::<f64>() / samples.len() as f64
    }

    #[test]
    fn test_rejects_non_positive_cutoff() {
        assert!(matches!(
            LowpassFilter::new(0.0, 5),
            Err(DspError::InvalidCutoff { .. })
        ));
        assert!(matches!(
            LowpassFilter::new(-100.0, 5),
            Err(DspError::InvalidCutoff { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_order() {
        assert!(matches!(
            LowpassFilter::new(1000.0, 0),
            Err(DspError::InvalidOrder { order: 0 })
        ));
    }

    #[test]
    fn test_rejects_cutoff_at_or_above_nyquist() {
        // 96 kHz buffer: Nyquist is 48 kHz, so 50 kHz must fail at apply
        // time even though construction succeeded.
        let mut filter = LowpassFilter::with_cutoff(50000.0).unwrap();
        let err = filter.apply(buffer(vec![0.0; 64], 96000)).unwrap_err();
        assert!(matches!(err, DspError::CutoffAboveNyquist { .. }));
    }

    #[test]
    fn test_empty_input_short_circuits_nyquist_check() {
        let mut filter = LowpassFilter::with_cutoff(50000.0).unwrap();
        let output = filter.apply(buffer(Vec::new(), 96000)).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_preserves_length_and_rate() {
        let mut filter = LowpassFilter::with_cutoff(1000.0).unwrap();
        let output = filter.apply(buffer(vec![0.1; 777], 48000)).unwrap();
        assert_eq!(output.len(), 777);
        assert_eq!(output.sample_rate(), 48000);
    }

    #[test]
    fn test_passes_dc() {
        let mut filter = LowpassFilter::with_cutoff(1000.0).unwrap();
        let output = filter.apply(buffer(vec![0.5; 4000], 48000)).unwrap();
        // Away from the edges the level should be essentially untouched.
        let middle = &output.samples()[1000..3000];
        for &s in middle {
            assert!((s - 0.5).abs() < 0.01, "sample was {s}");
        }
    }

    #[test]
    fn test_attenuates_tone_above_cutoff() {
        let rate = 48000;
        let tone = |freq: f64| -> Vec<f64> {
            (0..4800)
                .map(|i| (2.0 * PI * freq * i as f64 / rate as f64).sin() * 0.5)
                .collect()
        };

        let mut filter = LowpassFilter::new(1000.0, 5).unwrap();
        let passed = filter.apply(buffer(tone(200.0), rate)).unwrap();
        let stopped = filter.apply(buffer(tone(8000.0), rate)).unwrap();

        let passed_power = power(&passed.samples()[1000..3800]);
        let stopped_power = power(&stopped.samples()[1000..3800]);
        assert!(passed_power > 0.1, "passband power {passed_power}");
        assert!(
            stopped_power < passed_power / 1000.0,
            "stopband power {stopped_power}"
        );
    }

    #[test]
    fn test_zero_phase_keeps_symmetric_input_symmetric() {
        // A symmetric pulse filtered with zero net time shift stays
        // symmetric about its center.
        let n = 1001;
        let pulse: Vec<f64> = (0..n)
            .map(|i| {
                let d = (i as f64 - 500.0) / 40.0;
                0.8 * (-d * d).exp()
            })
            .collect();

        let mut filter = LowpassFilter::new(2000.0, 4).unwrap();
        let output = filter.apply(buffer(pulse, 48000)).unwrap();
        let samples = output.samples();
        for i in 0..n / 2 {
            let diff = (samples[i] - samples[n - 1 - i]).abs();
            assert!(diff < 1e-6, "asymmetry {diff} at index {i}");
        }
    }

    #[test]
    fn test_preserves_input_kind() {
        let mut filter = LowpassFilter::with_cutoff(1000.0).unwrap();

        let float_out = filter.apply(buffer(vec![0.2; 64], 48000)).unwrap();
        assert_eq!(float_out.kind(), SampleKind::Float);

        let pcm_in = SignalBuffer::from_pcm16(&[6553; 64], 48000).unwrap();
        let pcm_out = filter.apply(pcm_in).unwrap();
        assert_eq!(pcm_out.kind(), SampleKind::Pcm16);
    }

    #[test]
    fn test_odd_and_even_orders_design_cleanly() {
        for order in 1..=8 {
            let mut filter = LowpassFilter::new(1000.0, order).unwrap();
            let output = filter.apply(buffer(vec![0.3; 256], 48000)).unwrap();
            assert_eq!(output.len(), 256, "order {order}");
            assert!(output.samples().iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn test_butterworth_q_values() {
        // Classic tabulated values.
        let q2 = butterworth_section_qs(2);
        assert!((q2[0] - 0.7071).abs() < 1e-3);

        let q4 = butterworth_section_qs(4);
        assert!((q4[0] - 0.5412).abs() < 1e-3);
        assert!((q4[1] - 1.3066).abs() < 1e-3);

        let q5 = butterworth_section_qs(5);
        assert!((q5[0] - 0.6180).abs() < 1e-3);
        assert!((q5[1] - 1.6180).abs() < 1e-3);
    }
}
