//! Sample buffer over a forward-only PCM byte source.

use std::fmt;
use std::io::{self, Cursor, Read};

use tracing::{debug, trace, warn};

use crate::channels::{extract_channel, extract_stereo_pair};
use crate::codec;
use crate::error::{Error, Result};
use crate::format::FormatDescriptor;

/// Raw PCM payload plus the format it was recorded in.
///
/// The source is read strictly forward. The buffer owns its read cursor, so a
/// `SampleBuffer` needs `&mut self` to read and cannot be shared between readers.
/// Sample indices are frame indices: one index covers one sample of every channel.
pub struct SampleBuffer<R> {
    source: R,
    format: FormatDescriptor,
    byte_len: u64,
    position: u64,
}

impl<R: Read> SampleBuffer<R> {
    /// Wraps `source`, which must yield `byte_len` bytes of demuxed PCM payload.
    ///
    /// Fails with [`Error::FormatValidation`] unless `format` is
    /// [`FormatDescriptor::SUPPORTED`].
    pub fn new(source: R, format: FormatDescriptor, byte_len: u64) -> Result<Self> {
        format.check_supported()?;
        debug!(byte_len, %format, "opened sample buffer");
        Ok(Self {
            source,
            format,
            byte_len,
            position: 0,
        })
    }

    pub fn format(&self) -> &FormatDescriptor {
        &self.format
    }

    /// Number of frames in the payload. A trailing partial frame is not counted.
    pub fn sample_count(&self) -> u64 {
        self.byte_len / self.format.sample_size_bytes() as u64 / self.format.channels() as u64
    }

    /// Index of the next frame the source will yield.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.sample_count().saturating_sub(self.position)
    }

    /// Decodes frames `begin..end` into `out`, interleaved.
    ///
    /// `out` must hold exactly `(end - begin) * channels` values. Frames between the
    /// current position and `begin` are read and discarded; a window that starts
    /// before the current position cannot be served.
    pub fn get_samples(&mut self, begin: u64, end: u64, out: &mut [f64]) -> Result<()> {
        let byte_count = self.window_bytes(begin, end)?;
        let expected = byte_count / self.format.sample_size_bytes();
        if out.len() != expected {
            return Err(Error::out_of_range(format!(
                "output holds {} samples, window {}..{} needs {}",
                out.len(),
                begin,
                end,
                expected
            )));
        }

        let raw = self.read_window(begin, end, byte_count)?;
        codec::decode_into(&raw, &self.format, out)
    }

    /// Like [`get_samples`](Self::get_samples), allocating the output.
    pub fn read_samples(&mut self, begin: u64, end: u64) -> Result<Vec<f64>> {
        let byte_count = self.window_bytes(begin, end)?;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(byte_count / self.format.sample_size_bytes())
            .map_err(|_| self.capacity_error(begin, end))?;
        samples.resize(byte_count / self.format.sample_size_bytes(), 0.0);

        let raw = self.read_window(begin, end, byte_count)?;
        codec::decode_into(&raw, &self.format, &mut samples)?;
        Ok(samples)
    }

    /// Decodes the whole payload. Only possible before anything has been read.
    ///
    /// Decode and read failures are returned, never replaced by silence.
    pub fn get_all_samples(&mut self) -> Result<Vec<f64>> {
        self.read_samples(0, self.sample_count())
    }

    /// Copies one channel of `interleaved` into `out`, using this buffer's channel count.
    pub fn channel_samples(&self, channel: usize, interleaved: &[f64], out: &mut [f64]) -> Result<()> {
        extract_channel(channel, interleaved, self.format.channels(), out)
    }

    /// Decodes the whole payload of a two-channel buffer into `left` and `right`.
    ///
    /// Both outputs must hold exactly [`sample_count`](Self::sample_count) values.
    /// Only the mono profile is accepted by [`new`](Self::new), so every buffer that
    /// exists today is rejected here with [`Error::OutOfRange`].
    pub fn stereo_samples(&mut self, left: &mut [f64], right: &mut [f64]) -> Result<()> {
        if self.format.channels() != 2 {
            return Err(Error::out_of_range(format!(
                "stereo split needs 2 channels, format has {}",
                self.format.channels()
            )));
        }
        let count = self.sample_count();
        if left.len() as u64 != count || right.len() as u64 != count {
            return Err(Error::out_of_range(format!(
                "left/right hold {}/{} samples, buffer has {}",
                left.len(),
                right.len(),
                count
            )));
        }

        let interleaved = self.get_all_samples()?;
        extract_stereo_pair(&interleaved, left, right)
    }

    /// Reads every remaining frame and re-encodes it in this buffer's format.
    pub fn encode_all(&mut self) -> Result<Vec<u8>> {
        let samples = self.read_samples(self.position, self.sample_count())?;
        Ok(codec::encode(&samples, &self.format))
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Validates a frame window and returns its size in bytes.
    fn window_bytes(&self, begin: u64, end: u64) -> Result<usize> {
        if begin > end {
            return Err(Error::out_of_range(format!("window {}..{} is reversed", begin, end)));
        }

        let frames = end - begin;
        let frame_size = self.format.frame_size_bytes();
        let byte_count = frames
            .checked_mul(frame_size as u64)
            .filter(|bytes| *bytes <= isize::MAX as u64)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or_else(|| self.capacity_error(begin, end))?;

        let count = self.sample_count();
        if end > count {
            return Err(Error::out_of_range(format!(
                "window end {} exceeds sample count {}",
                end, count
            )));
        }
        if begin < self.position {
            return Err(Error::out_of_range(format!(
                "window starts at frame {} but the source is already at frame {}; reopen it to rewind",
                begin, self.position
            )));
        }

        Ok(byte_count)
    }

    fn capacity_error(&self, begin: u64, end: u64) -> Error {
        Error::Capacity {
            samples: end - begin,
            frame_size: self.format.frame_size_bytes(),
        }
    }

    /// Reads the bytes of a validated window.
    ///
    /// After an I/O failure the source sits at an unknown offset, so the buffer is
    /// marked as fully consumed and every later window fails.
    fn read_window(&mut self, begin: u64, end: u64, byte_count: usize) -> Result<Vec<u8>> {
        let mut raw = Vec::new();
        raw.try_reserve_exact(byte_count)
            .map_err(|_| self.capacity_error(begin, end))?;
        raw.resize(byte_count, 0);

        if let Err(err) = self.fill_window(begin, &mut raw) {
            warn!(position = self.position, error = %err, "source failed, discarding buffer");
            self.position = self.sample_count();
            return Err(err);
        }

        self.position = end;
        trace!(begin, end, bytes = byte_count, "read sample window");
        Ok(raw)
    }

    fn fill_window(&mut self, begin: u64, raw: &mut [u8]) -> Result<()> {
        if begin > self.position {
            let skip = (begin - self.position) * self.format.frame_size_bytes() as u64;
            let skipped = io::copy(&mut (&mut self.source).take(skip), &mut io::sink())?;
            if skipped < skip {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("source ended after skipping {} of {} bytes", skipped, skip),
                )));
            }
            trace!(from = self.position, to = begin, "skipped frames");
            self.position = begin;
        }

        self.source.read_exact(raw)?;
        Ok(())
    }
}

impl SampleBuffer<Cursor<Vec<u8>>> {
    /// Wraps an in-memory payload.
    pub fn from_bytes(bytes: Vec<u8>, format: FormatDescriptor) -> Result<Self> {
        let byte_len = bytes.len() as u64;
        Self::new(Cursor::new(bytes), format, byte_len)
    }
}

impl<R> fmt::Display for SampleBuffer<R>
where
    R: Read,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Sample] samples: {}, format: {}", self.sample_count(), self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(bytes: Vec<u8>) -> SampleBuffer<Cursor<Vec<u8>>> {
        SampleBuffer::from_bytes(bytes, FormatDescriptor::SUPPORTED).unwrap()
    }

    #[test]
    fn test_rejects_unsupported_profile() {
        let eight_bit = FormatDescriptor::new(16000, 8, 1, true, false).unwrap();
        let err = SampleBuffer::from_bytes(vec![0; 4], eight_bit).err().unwrap();
        assert!(matches!(err, Error::FormatValidation { .. }));

        let stereo = FormatDescriptor::new(16000, 16, 2, true, false).unwrap();
        assert!(SampleBuffer::from_bytes(vec![0; 4], stereo).is_err());
    }

    #[test]
    fn test_sample_count_truncates() {
        assert_eq!(buffer(vec![0; 8]).sample_count(), 4);
        assert_eq!(buffer(vec![0; 9]).sample_count(), 4);
        assert_eq!(buffer(Vec::new()).sample_count(), 0);
    }

    #[test]
    fn test_get_samples_full_range() {
        let mut buf = buffer(vec![0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80]);
        let count = buf.sample_count();
        let mut out = vec![0.0; count as usize];
        buf.get_samples(0, count, &mut out).unwrap();
        assert_eq!(out, vec![0.0, 32767.0 / 32768.0, -1.0]);
        assert_eq!(buf.position(), 3);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_get_samples_past_end_fails() {
        let mut buf = buffer(vec![0; 6]);
        let mut out = vec![0.0; 4];
        let err = buf.get_samples(0, 4, &mut out).unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
        // Nothing was consumed
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_get_samples_unaddressable_window() {
        let mut buf = buffer(vec![0; 4]);
        let err = buf.get_samples(0, u64::MAX, &mut []).unwrap_err();
        assert!(matches!(err, Error::Capacity { samples: u64::MAX, frame_size: 2 }));
    }

    #[test]
    fn test_get_samples_rejects_missized_output() {
        let mut buf = buffer(vec![0; 8]);
        let mut out = vec![0.0; 3];
        assert!(matches!(
            buf.get_samples(0, 2, &mut out),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn test_sequential_windows_and_skip() {
        let bytes = codec::encode(&[0.0, 0.25, 0.5, -0.25, -0.5], &FormatDescriptor::SUPPORTED);
        let mut buf = buffer(bytes);

        assert_eq!(buf.read_samples(0, 1).unwrap(), vec![0.0]);
        // Skips frame 1
        let window = buf.read_samples(2, 4).unwrap();
        assert_eq!(window.len(), 2);
        assert!((window[0] - 0.5).abs() < 1e-4);
        assert!((window[1] + 0.25).abs() < 1e-4);
        assert_eq!(buf.position(), 4);

        let err = buf.read_samples(1, 2).unwrap_err();
        assert!(matches!(err, Error::OutOfRange(_)));
    }

    #[test]
    fn test_short_source_is_io_error() {
        // Declares more bytes than the source yields
        let mut buf =
            SampleBuffer::new(Cursor::new(vec![0u8; 2]), FormatDescriptor::SUPPORTED, 8).unwrap();
        let err = buf.get_all_samples().unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        // Source offset is unknown now, so nothing further can be read
        assert_eq!(buf.position(), 4);
        assert_eq!(buf.remaining(), 0);
        assert!(matches!(buf.read_samples(0, 1), Err(Error::OutOfRange(_))));
        assert!(buf.encode_all().unwrap().is_empty());
    }

    #[test]
    fn test_failed_read_after_skip_spends_buffer() {
        // Six frames declared, the source holds only three
        let mut buf =
            SampleBuffer::new(Cursor::new(vec![0u8; 6]), FormatDescriptor::SUPPORTED, 12).unwrap();
        let err = buf.read_samples(2, 5).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(buf.position(), 6);
        assert!(matches!(buf.read_samples(5, 6), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn test_unallocatable_window_is_capacity_error() {
        let mut buf =
            SampleBuffer::new(io::repeat(0), FormatDescriptor::SUPPORTED, 1 << 62).unwrap();
        let err = buf.read_samples(0, 1 << 61).unwrap_err();
        assert!(matches!(
            err,
            Error::Capacity { samples, frame_size: 2 } if samples == 1 << 61
        ));
        // Nothing was read
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_get_all_samples() {
        let mut buf = buffer(vec![0x00, 0x40, 0x00, 0xC0]);
        assert_eq!(buf.get_all_samples().unwrap(), vec![0.5, -0.5]);
    }

    #[test]
    fn test_stereo_samples_needs_two_channels() {
        let mut buf = buffer(vec![0; 4]);
        // Correctly sized for the frame count, still rejected for a mono buffer
        let (mut left, mut right) = (vec![0.0; 2], vec![0.0; 2]);
        assert!(matches!(
            buf.stereo_samples(&mut left, &mut right),
            Err(Error::OutOfRange(_))
        ));
        assert_eq!(buf.position(), 0);
        assert_eq!(left, vec![0.0; 2]);
    }

    #[test]
    fn test_channel_samples_mono_is_identity() {
        let buf = buffer(vec![0; 4]);
        let mut out = vec![0.0; 3];
        buf.channel_samples(0, &[0.1, 0.2, 0.3], &mut out).unwrap();
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
        assert!(buf.channel_samples(1, &[0.1, 0.2, 0.3], &mut out).is_err());
    }

    #[test]
    fn test_encode_all_reproduces_payload() {
        let bytes = vec![0x00, 0x00, 0x00, 0x40, 0x00, 0xC0, 0x00, 0x20];
        let mut buf = buffer(bytes.clone());
        assert_eq!(buf.encode_all().unwrap(), bytes);
    }

    #[test]
    fn test_encode_all_pulls_full_scale_in_by_one_code() {
        // Decode divides by 32768, encode multiplies by 32767
        let mut buf = buffer(vec![0xFF, 0x7F, 0x01, 0x80]);
        assert_eq!(buf.encode_all().unwrap(), vec![0xFE, 0x7F, 0x02, 0x80]);
    }

    #[test]
    fn test_encode_all_after_partial_read() {
        let mut buf = buffer(vec![0x00, 0x40, 0x00, 0xC0]);
        buf.read_samples(0, 1).unwrap();
        assert_eq!(buf.encode_all().unwrap(), vec![0x00, 0xC0]);
    }

    #[test]
    fn test_display() {
        let buf = buffer(vec![0; 32000]);
        assert_eq!(
            buf.to_string(),
            "[Sample] samples: 16000, format: PCM_SIGNED 16000 Hz, 16 bit, mono, 2 bytes/frame, little-endian"
        );
    }
}
