//! bitpulse signal core
//!
//! A small single-threaded audio pipeline: normalized sample buffers are
//! folded through an ordered chain of transformation stages and handed to a
//! WAV sink or a visualizer.
//!
//! # Stages
//!
//! - **Delta-sigma modulation** - stateful 1-bit quantization with
//!   oversampling and naive decimation
//! - **PWM encoding** - stateless comparison against a sawtooth carrier
//! - **Lowpass filtering** - Butterworth cascade applied bidirectionally
//!   for zero phase shift
//!
//! # Example
//!
//! ```
//! use bitpulse_dsp::{DeltaSigmaModulator, LowpassFilter, SignalBuffer, TransformChain};
//!
//! # fn main() -> bitpulse_dsp::DspResult<()> {
//! let samples: Vec<f64> = (0..960)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 96000.0).sin())
//!     .collect();
//! let buffer = SignalBuffer::from_samples(samples, 96000)?;
//!
//! let mut chain = TransformChain::new();
//! chain
//!     .attach_stage(DeltaSigmaModulator::new(32)?)
//!     .attach_stage(LowpassFilter::with_cutoff(1000.0)?);
//! let filtered = chain.run(buffer)?;
//! assert_eq!(filtered.len(), 960);
//! # Ok(())
//! # }
//! ```
//!
//! # State and threading
//!
//! The only cross-call state in the pipeline is the modulator's integrator,
//! owned by its instance and resettable via
//! [`DeltaSigmaModulator::reset`]. Nothing here is synchronized; using one
//! stage from several threads requires external locking.

pub mod buffer;
pub mod chain;
pub mod error;
pub mod filter;
pub mod modulator;
pub mod pwm;
pub mod wav;

// Re-export main types at crate root
pub use buffer::{SampleKind, SignalBuffer};
pub use chain::{shared, SharedStage, TransformChain, TransformStage};
pub use error::{DspError, DspResult};
pub use filter::LowpassFilter;
pub use modulator::DeltaSigmaModulator;
pub use pwm::PwmEncoder;
pub use wav::WavResult;
