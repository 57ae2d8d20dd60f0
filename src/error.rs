//! Error types for PCM sample decoding and encoding.

use thiserror::Error;

use crate::format::FormatDescriptor;

/// Result type for sample operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding, encoding or slicing samples.
#[derive(Debug, Error)]
pub enum Error {
    /// The source format is not the supported profile.
    #[error("unsupported audio format: received {actual}, expected {expected}")]
    FormatValidation {
        /// Format declared by the source.
        actual: FormatDescriptor,
        /// The one profile this crate accepts.
        expected: FormatDescriptor,
    },

    /// Byte length is not a whole number of samples.
    #[error("malformed input: {len} bytes is not a multiple of the {sample_size}-byte sample size")]
    MalformedInput {
        /// Length of the rejected byte sequence.
        len: usize,
        /// Bytes per sample for the declared format.
        sample_size: usize,
    },

    /// Requested window needs more bytes than the platform can address.
    #[error("too many samples: {samples} frames of {frame_size} bytes cannot be addressed, try a smaller window")]
    Capacity {
        /// Frames requested.
        samples: u64,
        /// Bytes per frame.
        frame_size: usize,
    },

    /// Index or buffer size outside what the operation allows.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Descriptor fields that no PCM stream can have.
    #[error("invalid format descriptor: {0}")]
    InvalidDescriptor(String),

    /// Container parsed, but its payload is not linear integer PCM.
    #[error("unsupported container: {0}")]
    UnsupportedContainer(String),

    /// I/O error from the byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV container error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl Error {
    /// Creates an out-of-range error.
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_validation_message_names_both_formats() {
        let actual = FormatDescriptor::new(8000, 8, 1, false, false).unwrap();
        let err = Error::FormatValidation {
            actual,
            expected: FormatDescriptor::SUPPORTED,
        };
        let msg = err.to_string();
        assert!(msg.contains("PCM_UNSIGNED 8000 Hz, 8 bit"));
        assert!(msg.contains("PCM_SIGNED 16000 Hz, 16 bit"));
    }

    #[test]
    fn test_out_of_range_helper() {
        let err = Error::out_of_range("channel 3 of 2");
        assert_eq!(err.to_string(), "out of range: channel 3 of 2");
    }
}
