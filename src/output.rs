use chrono::{DateTime, Local};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Write;
use std::path::Path;

use crate::codec::{encode, quantize};
use crate::error::{Error, Result};
use crate::format::FormatDescriptor;

/// Encode samples and write the raw payload to any byte sink
pub fn write_raw<W: Write>(mut writer: W, samples: &[f64], format: &FormatDescriptor) -> Result<()> {
    writer.write_all(&encode(samples, format))?;
    writer.flush()?;
    Ok(())
}

/// Write samples as a WAV file in the given format.
/// WAV only carries little-endian payloads, unsigned at 8 bits and signed above.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f64], format: &FormatDescriptor) -> Result<()> {
    if format.is_big_endian() {
        return Err(Error::UnsupportedContainer(
            "WAV cannot carry a big-endian payload".into(),
        ));
    }
    if format.is_signed() != (format.bits_per_sample() > 8) {
        return Err(Error::UnsupportedContainer(format!(
            "WAV cannot carry {}",
            format
        )));
    }

    let spec = WavSpec {
        channels: format.channels(),
        sample_rate: format.sample_rate_hz(),
        bits_per_sample: format.bits_per_sample(),
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for &sample in samples {
        // hound takes signed values for every depth, 8-bit included
        writer.write_sample(quantize(sample, format) as i32)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Generate output filename for an extracted channel
pub fn generate_filename(stem: &str, channel: usize, raw: bool, base_time: DateTime<Local>) -> String {
    format!(
        "{}_ch{}_{}.{}",
        stem,
        channel,
        base_time.format("%Y-%m-%d_%H-%M-%S"),
        if raw { "pcm" } else { "wav" }
    )
}
