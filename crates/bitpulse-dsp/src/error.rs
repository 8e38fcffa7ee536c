//! Error types for the signal core.

use thiserror::Error;

/// Result type for signal operations.
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur while configuring or running pipeline stages.
#[derive(Debug, Error)]
pub enum DspError {
    /// Oversampling ratio must be a positive integer.
    #[error("invalid oversampling ratio: {ratio} (must be positive)")]
    InvalidOversamplingRatio {
        /// The rejected ratio.
        ratio: usize,
    },

    /// PWM carrier sample length must be a positive integer.
    #[error("invalid PWM sample length: {length} (must be positive)")]
    InvalidSampleLength {
        /// The rejected sample length.
        length: usize,
    },

    /// Cutoff frequency must be positive.
    #[error("invalid cutoff frequency: {cutoff} Hz (must be positive)")]
    InvalidCutoff {
        /// The rejected cutoff frequency in Hz.
        cutoff: f64,
    },

    /// Filter order must be a positive integer.
    #[error("invalid filter order: {order} (must be positive)")]
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },

    /// Sample rate must be positive.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate {
        /// The rejected sample rate in Hz.
        rate: u32,
    },

    /// Cutoff frequency violates the Nyquist limit of the buffer being
    /// filtered. Raised at apply time because it depends on the buffer's
    /// sample rate, not on construction-time configuration.
    #[error("cutoff frequency {cutoff} Hz must be below the Nyquist frequency {nyquist} Hz")]
    CutoffAboveNyquist {
        /// Configured cutoff frequency in Hz.
        cutoff: f64,
        /// Nyquist frequency of the buffer in Hz.
        nyquist: f64,
    },

    /// Malformed or unsupported WAV payload.
    #[error("invalid WAV data: {message}")]
    InvalidWav {
        /// What was wrong with the payload.
        message: String,
    },

    /// I/O error from the sink path.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DspError {
    /// Creates an invalid-WAV error.
    pub fn invalid_wav(message: impl Into<String>) -> Self {
        Self::InvalidWav {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nyquist_error_names_both_frequencies() {
        let err = DspError::CutoffAboveNyquist {
            cutoff: 50000.0,
            nyquist: 48000.0,
        };
        assert!(err.to_string().contains("50000"));
        assert!(err.to_string().contains("48000"));
    }

    #[test]
    fn test_invalid_wav_helper() {
        let err = DspError::invalid_wav("missing data chunk");
        assert!(err.to_string().contains("missing data chunk"));
    }
}
