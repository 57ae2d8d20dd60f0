//! Fixed-profile PCM sample codec.
//!
//! Converts raw PCM payloads into normalized `f64` samples and back:
//!
//! - [`format`]: the [`FormatDescriptor`] value and the one supported profile
//! - [`codec`]: pure byte/sample conversion for any byte-aligned integer PCM
//! - [`buffer`]: [`SampleBuffer`], bounds-checked windowed reads over a forward-only source
//! - [`channels`]: deinterleaving into single channels or stereo pairs
//! - [`input`] / [`output`]: WAV and headerless file adapters
//!
//! # Example
//!
//! ```rust
//! use pcm_sample::{FormatDescriptor, SampleBuffer};
//!
//! let bytes = vec![0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80];
//! let mut buffer = SampleBuffer::from_bytes(bytes, FormatDescriptor::SUPPORTED).unwrap();
//! assert_eq!(buffer.sample_count(), 3);
//!
//! let samples = buffer.get_all_samples().unwrap();
//! assert_eq!(samples, vec![0.0, 32767.0 / 32768.0, -1.0]);
//! ```

pub mod buffer;
pub mod channels;
pub mod codec;
pub mod error;
pub mod format;
pub mod input;
pub mod output;

pub use buffer::SampleBuffer;
pub use error::{Error, Result};
pub use format::FormatDescriptor;
