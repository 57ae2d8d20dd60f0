use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::buffer::SampleBuffer;
use crate::error::Result;
use crate::format::FormatDescriptor;

/// Open a headerless PCM file whose layout is known out of band.
///
/// The whole file is payload, so its length is the byte length of the buffer.
pub fn open_raw<P: AsRef<Path>>(
    path: P,
    format: FormatDescriptor,
) -> Result<SampleBuffer<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let byte_len = file.metadata()?.len();
    debug!(path = %path.display(), byte_len, "opened raw PCM file");
    SampleBuffer::new(BufReader::new(file), format, byte_len)
}
