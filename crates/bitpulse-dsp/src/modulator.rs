//! First-order delta-sigma modulator with oversampling and decimation.
//!
//! The modulator converts a multi-level signal into a 1-bit stream whose
//! running average approximates the input. The input is oversampled by
//! linear interpolation, pushed through the feedback quantizer, then
//! decimated back to the original length by naive subsampling. The missing
//! anti-alias filter on decimation is a deliberate simplification of this
//! design, not an oversight.

use std::ops::RangeInclusive;

use crate::buffer::{SampleKind, SignalBuffer};
use crate::chain::TransformStage;
use crate::error::{DspError, DspResult};

/// Conventional range for the oversampling ratio. Ratios outside it still
/// work; they just trade fidelity against sample count unusually hard.
pub const CONVENTIONAL_RATIO_RANGE: RangeInclusive<usize> = 16..=256;

/// Stateful 1-bit quantizer.
///
/// The integrator accumulator persists across `apply` calls, so feeding a
/// long signal in consecutive slices through one instance behaves like
/// feeding it in one piece. Call [`DeltaSigmaModulator::reset`] between
/// logically independent segments. Not synchronized; concurrent use of one
/// instance is the caller's problem to lock.
#[derive(Debug, Clone)]
pub struct DeltaSigmaModulator {
    oversampling_ratio: usize,
    integrator: f64,
}

impl DeltaSigmaModulator {
    /// Creates a modulator with the given oversampling ratio.
    ///
    /// A zero ratio is a configuration error. A ratio outside
    /// [`CONVENTIONAL_RATIO_RANGE`] is accepted with a console warning.
    pub fn new(oversampling_ratio: usize) -> DspResult<Self> {
        if oversampling_ratio == 0 {
            return Err(DspError::InvalidOversamplingRatio {
                ratio: oversampling_ratio,
            });
        }
        if !CONVENTIONAL_RATIO_RANGE.contains(&oversampling_ratio) {
            eprintln!(
                "warning: oversampling ratio {oversampling_ratio} is outside the conventional range 16..=256"
            );
        }
        Ok(Self {
            oversampling_ratio,
            integrator: 0.0,
        })
    }

    /// Configured oversampling ratio.
    pub fn oversampling_ratio(&self) -> usize {
        self.oversampling_ratio
    }

    /// Current integrator accumulator value.
    pub fn integrator_state(&self) -> f64 {
        self.integrator
    }

    /// Zeroes the integrator, making the next `apply` behave like a fresh
    /// instance.
    pub fn reset(&mut self) {
        self.integrator = 0.0;
    }

    /// Oversamples by linear interpolation from `n` to `n * ratio` samples.
    ///
    /// Target index `i` maps uniformly onto the continuous source position
    /// range [0, n-1]; the sample is interpolated between the two bracketing
    /// originals.
    fn oversample(&self, samples: &[f64]) -> Vec<f64> {
        let n = samples.len();
        let target_len = n * self.oversampling_ratio;
        if n == 1 || target_len == 1 {
            return vec![samples[0]; target_len];
        }

        let span = (n - 1) as f64;
        let step = span / (target_len - 1) as f64;
        let mut out = Vec::with_capacity(target_len);
        for i in 0..target_len {
            let pos = step * i as f64;
            let lo = pos.floor() as usize;
            if lo + 1 >= n {
                out.push(samples[n - 1]);
            } else {
                let frac = pos - lo as f64;
                out.push(samples[lo] + (samples[lo + 1] - samples[lo]) * frac);
            }
        }
        out
    }

    /// The first-order delta-sigma core.
    ///
    /// For each sample the feedback error against the previous output is
    /// accumulated into the integrator, and the accumulator sign picks the
    /// output level. The previous output starts at 0.0 for each call; the
    /// integrator carries over from the previous call.
    fn modulate(&mut self, oversampled: &[f64]) -> Vec<f64> {
        let mut output = Vec::with_capacity(oversampled.len());
        let mut acc = self.integrator;
        let mut prev_out = 0.0;

        for &x in oversampled {
            let error = x - prev_out;
            acc += error;
            let level = if acc >= 0.0 { 1.0 } else { -1.0 };
            output.push(level);
            prev_out = level;
        }

        self.integrator = acc;
        output
    }
}

impl TransformStage for DeltaSigmaModulator {
    fn apply(&mut self, input: SignalBuffer) -> DspResult<SignalBuffer> {
        // Empty input produces empty output and leaves the integrator alone.
        if input.is_empty() {
            return Ok(input.retagged(Vec::new(), SampleKind::Float));
        }

        let original_len = input.len();
        let oversampled = self.oversample(input.samples());
        let modulated = self.modulate(&oversampled);

        // Naive decimation: keep every ratio-th sample.
        let mut decimated: Vec<f64> = modulated
            .iter()
            .copied()
            .step_by(self.oversampling_ratio)
            .collect();

        // Length correction: truncate overshoot, pad shortfall with the
        // last produced value.
        decimated.truncate(original_len);
        if let Some(&last) = decimated.last() {
            while decimated.len() < original_len {
                decimated.push(last);
            }
        }

        Ok(input.retagged(decimated, SampleKind::Float))
    }
}
