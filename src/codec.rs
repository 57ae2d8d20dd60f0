//! Conversion between raw PCM bytes and normalized `f64` samples.
//!
//! Decoding assembles each sample most-significant byte first, sign-extends it into an
//! `i64` accumulator and divides by `2^(bits - 1)`, so a signed 16-bit stream maps
//! `0x8000` to `-1.0` and `0x7FFF` to `32767 / 32768`. Encoding scales by
//! `2^(bits - 1) - 1` instead, so `1.0` encodes to the largest positive code and a
//! decode/encode cycle pulls full-scale codes in by one.
//!
//! Both directions are pure and safe to call from any thread.

use crate::error::{Error, Result};
use crate::format::FormatDescriptor;

/// Decodes `bytes` into normalized samples in `[-1.0, 1.0)`.
pub fn decode(bytes: &[u8], format: &FormatDescriptor) -> Result<Vec<f64>> {
    let count = checked_sample_count(bytes, format)?;
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(count)
        .map_err(|_| Error::Capacity {
            samples: count as u64,
            frame_size: format.sample_size_bytes(),
        })?;
    samples.resize(count, 0.0);
    decode_into(bytes, format, &mut samples)?;
    Ok(samples)
}

/// Decodes `bytes` into a caller-sized `out`, which must hold exactly one slot per sample.
pub fn decode_into(bytes: &[u8], format: &FormatDescriptor, out: &mut [f64]) -> Result<()> {
    let count = checked_sample_count(bytes, format)?;
    if out.len() != count {
        return Err(Error::out_of_range(format!(
            "output holds {} samples, input has {}",
            out.len(),
            count
        )));
    }

    let sample_size = format.sample_size_bytes();
    let scale = full_scale(format.bits_per_sample()) as f64;
    for (window, slot) in bytes.chunks_exact(sample_size).zip(out.iter_mut()) {
        *slot = assemble(window, format) as f64 / scale;
    }

    Ok(())
}

/// Encodes normalized samples into raw bytes in the byte order `format` declares.
///
/// Output length is always `samples.len() * format.sample_size_bytes()`.
pub fn encode(samples: &[f64], format: &FormatDescriptor) -> Vec<u8> {
    let sample_size = format.sample_size_bytes();
    let offset = if format.is_signed() {
        0
    } else {
        full_scale(format.bits_per_sample())
    };

    let mut bytes = Vec::with_capacity(samples.len() * sample_size);
    for &sample in samples {
        let raw = (quantize(sample, format) + offset) as u64;
        let le = raw.to_le_bytes();
        let window = &le[..sample_size];
        if format.is_big_endian() {
            bytes.extend(window.iter().rev());
        } else {
            bytes.extend_from_slice(window);
        }
    }
    bytes
}

/// Scales a normalized sample to the signed integer range of `format`.
///
/// Rounds to nearest and clamps to `[-2^(bits-1), 2^(bits-1) - 1]`. NaN maps to zero.
pub fn quantize(sample: f64, format: &FormatDescriptor) -> i64 {
    if sample.is_nan() {
        return 0;
    }
    let top = full_scale(format.bits_per_sample());
    let raw = (sample * (top - 1) as f64).round();
    raw.clamp(-(top as f64), (top - 1) as f64) as i64
}

/// `2^(bits - 1)`: the magnitude of the most negative signed sample.
fn full_scale(bits: u16) -> i64 {
    1i64 << (bits - 1)
}

fn checked_sample_count(bytes: &[u8], format: &FormatDescriptor) -> Result<usize> {
    let sample_size = format.sample_size_bytes();
    if bytes.len() % sample_size != 0 {
        return Err(Error::MalformedInput {
            len: bytes.len(),
            sample_size,
        });
    }
    Ok(bytes.len() / sample_size)
}

/// Builds the signed integer for one sample window.
fn assemble(window: &[u8], format: &FormatDescriptor) -> i64 {
    let len = window.len();
    let byte_at = |j: usize| {
        if format.is_big_endian() {
            window[j]
        } else {
            window[len - 1 - j]
        }
    };

    let mut value = if format.is_signed() {
        byte_at(0) as i8 as i64
    } else {
        byte_at(0) as i64
    };
    for j in 1..len {
        value = (value << 8) + byte_at(j) as i64;
    }

    if format.is_signed() {
        value
    } else {
        value - full_scale(format.bits_per_sample())
    }
}
