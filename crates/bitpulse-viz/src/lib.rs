//! bitpulse waveform visualizer
//!
//! Renders a [`SignalBuffer`] to a fixed-size waveform PNG: per-column
//! min/max envelope with an RMS body, over a center line and time grid.
//! Encoding uses fixed compression settings so identical buffers produce
//! byte-identical images.
//!
//! [`SignalBuffer`]: bitpulse_dsp::SignalBuffer

pub mod waveform;

pub use waveform::{render_waveform, save_waveform_png, WaveformImage};

use thiserror::Error;

/// Errors from visualization.
#[derive(Debug, Error)]
pub enum VizError {
    /// I/O error while writing the image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// Result type for visualization operations.
pub type VizResult<T> = Result<T, VizError>;
