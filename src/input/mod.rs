//! Byte-source adapters.
//!
//! Container parsing stops here: each adapter resolves a [`FormatDescriptor`] and hands
//! [`SampleBuffer`] only the demuxed PCM payload.
//!
//! [`FormatDescriptor`]: crate::FormatDescriptor
//! [`SampleBuffer`]: crate::SampleBuffer

pub mod stream;
pub mod wav;

pub use stream::open_raw;
pub use wav::{open_wav, read_wav, WavPayload};
