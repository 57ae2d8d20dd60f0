//! PCM format descriptor.
//!
//! A [`FormatDescriptor`] is a plain value: any byte-aligned integer PCM layout can be
//! described, but only [`FormatDescriptor::SUPPORTED`] is accepted by
//! [`SampleBuffer`](crate::SampleBuffer).

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Sample rate, bit depth, channel count, signedness and byte order of a PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    sample_rate_hz: u32,
    bits_per_sample: u16,
    channels: u16,
    signed: bool,
    big_endian: bool,
}

impl FormatDescriptor {
    /// 16 kHz, 16-bit, mono, signed, little-endian.
    pub const SUPPORTED: FormatDescriptor = FormatDescriptor {
        sample_rate_hz: 16000,
        bits_per_sample: 16,
        channels: 1,
        signed: true,
        big_endian: false,
    };

    pub fn new(
        sample_rate_hz: u32,
        bits_per_sample: u16,
        channels: u16,
        signed: bool,
        big_endian: bool,
    ) -> Result<Self> {
        if !matches!(bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(Error::InvalidDescriptor(format!(
                "bits per sample must be 8, 16, 24 or 32, got {}",
                bits_per_sample
            )));
        }
        if channels == 0 {
            return Err(Error::InvalidDescriptor("channel count must be at least 1".into()));
        }
        if sample_rate_hz == 0 {
            return Err(Error::InvalidDescriptor("sample rate must be non-zero".into()));
        }

        Ok(Self {
            sample_rate_hz,
            bits_per_sample,
            channels,
            signed,
            big_endian,
        })
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// Bytes occupied by one sample of one channel.
    pub fn sample_size_bytes(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// Bytes occupied by one frame (one sample per channel).
    pub fn frame_size_bytes(&self) -> usize {
        self.sample_size_bytes() * self.channels as usize
    }

    pub fn bytes_per_second(&self) -> u64 {
        self.sample_rate_hz as u64 * self.frame_size_bytes() as u64
    }

    /// Playback duration of `byte_len` bytes of payload. Partial frames are ignored.
    pub fn duration(&self, byte_len: u64) -> Duration {
        let frames = byte_len / self.frame_size_bytes() as u64;
        let nanos = frames as u128 * 1_000_000_000 / self.sample_rate_hz as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    /// Field-wise equality. No profile is ever treated as compatible with another.
    pub fn matches(&self, other: &FormatDescriptor) -> bool {
        self == other
    }

    /// Fails with [`Error::FormatValidation`] unless this is the supported profile.
    pub fn check_supported(&self) -> Result<()> {
        if Self::SUPPORTED.matches(self) {
            Ok(())
        } else {
            Err(Error::FormatValidation {
                actual: *self,
                expected: Self::SUPPORTED,
            })
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = if self.signed { "PCM_SIGNED" } else { "PCM_UNSIGNED" };
        let channels = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{} channels", n),
        };
        let order = if self.big_endian { "big-endian" } else { "little-endian" };
        write!(
            f,
            "{} {} Hz, {} bit, {}, {} bytes/frame, {}",
            encoding,
            self.sample_rate_hz,
            self.bits_per_sample,
            channels,
            self.frame_size_bytes(),
            order
        )
    }
}
