use hound::{SampleFormat, WavReader, WavSpec};
use std::fs::File;
use std::io::{BufReader, Read, Take};
use std::path::Path;

use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::error::{Error, Result};
use crate::format::FormatDescriptor;

/// The `data` chunk of a WAV file, positioned at its first byte.
pub type WavPayload<R> = Take<R>;

/// Open a WAV file and wrap its PCM payload in a [`SampleBuffer`]
pub fn open_wav<P: AsRef<Path>>(path: P) -> Result<SampleBuffer<WavPayload<BufReader<File>>>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening WAV file");
    read_wav(BufReader::new(File::open(path)?))
}

/// Parse the RIFF header from `reader` and hand the payload on.
/// Only 16 kHz 16-bit mono survives [`SampleBuffer::new`].
pub fn read_wav<R: Read>(reader: R) -> Result<SampleBuffer<WavPayload<R>>> {
    let reader = WavReader::new(HeaderTap::new(reader))?;
    let spec = reader.spec();
    let sample_count = reader.len();
    let tap = reader.into_inner();

    let format = descriptor_for(&spec)?;
    let block_align = block_align(&tap.header).ok_or_else(|| {
        Error::UnsupportedContainer("WAV header has no readable fmt chunk".into())
    })?;
    if block_align as usize != format.frame_size_bytes() {
        return Err(Error::UnsupportedContainer(format!(
            "{}-byte frames declared, {} needs {}-byte frames",
            block_align,
            format,
            format.frame_size_bytes()
        )));
    }

    // hound counts samples across all channels
    let byte_len = sample_count as u64 * format.sample_size_bytes() as u64;
    debug!(%format, byte_len, "resolved WAV payload");

    let payload = tap.inner.take(byte_len);
    SampleBuffer::new(payload, format, byte_len)
}

/// Keeps a copy of every header byte hound consumes.
struct HeaderTap<R> {
    inner: R,
    header: Vec<u8>,
}

impl<R> HeaderTap<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            header: Vec::new(),
        }
    }
}

impl<R: Read> Read for HeaderTap<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.header.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// `nBlockAlign` of the fmt chunk: bytes per frame as stored in the data chunk.
fn block_align(header: &[u8]) -> Option<u16> {
    if header.len() < 12 || &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= header.len() {
        let chunk_id = &header[pos..pos + 4];
        let chunk_size = u32::from_le_bytes([
            header[pos + 4],
            header[pos + 5],
            header[pos + 6],
            header[pos + 7],
        ]) as usize;
        let body = pos + 8;

        if chunk_id == b"fmt " {
            if chunk_size < 14 || body + 14 > header.len() {
                return None;
            }
            return Some(u16::from_le_bytes([header[body + 12], header[body + 13]]));
        }

        pos = body.checked_add(chunk_size)?;
        // Chunks are word aligned
        if chunk_size % 2 != 0 {
            pos += 1;
        }
    }

    None
}

/// WAV integer PCM is little-endian; 8-bit is unsigned, wider depths are signed.
fn descriptor_for(spec: &WavSpec) -> Result<FormatDescriptor> {
    if spec.sample_format == SampleFormat::Float {
        return Err(Error::UnsupportedContainer(format!(
            "{}-bit float WAV is not integer PCM",
            spec.bits_per_sample
        )));
    }

    FormatDescriptor::new(
        spec.sample_rate,
        spec.bits_per_sample,
        spec.channels,
        spec.bits_per_sample > 8,
        false,
    )
}
