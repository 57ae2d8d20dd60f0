//! Channel extraction from interleaved sample sequences.

use crate::error::{Error, Result};

/// Copies channel `channel` of `interleaved` into `out`.
///
/// `out[i] = interleaved[channel_count * i + channel]`. `out` must hold exactly one value
/// per frame; a mis-sized output is rejected rather than partially filled.
pub fn extract_channel(
    channel: usize,
    interleaved: &[f64],
    channel_count: u16,
    out: &mut [f64],
) -> Result<()> {
    let channels = channel_count as usize;
    let frames = frame_count(interleaved, channels)?;
    if channel >= channels {
        return Err(Error::out_of_range(format!(
            "channel {} requested from {}-channel samples",
            channel, channel_count
        )));
    }
    if out.len() != frames {
        return Err(Error::out_of_range(format!(
            "channel output holds {} samples, input has {} frames",
            out.len(),
            frames
        )));
    }

    for (slot, frame) in out.iter_mut().zip(interleaved.chunks_exact(channels)) {
        *slot = frame[channel];
    }
    Ok(())
}

/// Splits `[L0, R0, L1, R1, ...]` into `left` and `right` in one pass.
pub fn extract_stereo_pair(interleaved: &[f64], left: &mut [f64], right: &mut [f64]) -> Result<()> {
    let frames = frame_count(interleaved, 2)?;
    if left.len() != frames || right.len() != frames {
        return Err(Error::out_of_range(format!(
            "left/right hold {}/{} samples, input has {} frames",
            left.len(),
            right.len(),
            frames
        )));
    }

    for ((l, r), frame) in left
        .iter_mut()
        .zip(right.iter_mut())
        .zip(interleaved.chunks_exact(2))
    {
        *l = frame[0];
        *r = frame[1];
    }
    Ok(())
}

fn frame_count(interleaved: &[f64], channels: usize) -> Result<usize> {
    if channels == 0 {
        return Err(Error::out_of_range("channel count must be at least 1"));
    }
    if interleaved.len() % channels != 0 {
        return Err(Error::out_of_range(format!(
            "{} interleaved samples is not a whole number of {}-channel frames",
            interleaved.len(),
            channels
        )));
    }
    Ok(interleaved.len() / channels)
}
