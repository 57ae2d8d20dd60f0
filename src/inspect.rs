use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use chrono::Local;
use tracing::{debug, info};

use pcm_sample::output::{generate_filename, write_raw, write_wav};
use pcm_sample::SampleBuffer;

pub struct Options<'a> {
    pub output_dir: Option<&'a Path>,
    pub channel: usize,
    pub raw: bool,
}

/// Decode a clip, report its level, and write the requested channel if asked
pub fn process<R: Read>(
    mut buffer: SampleBuffer<R>,
    input_path: &Path,
    options: &Options<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = *buffer.format();
    let sample_count = buffer.sample_count();
    let duration = format.duration(sample_count * format.frame_size_bytes() as u64);

    println!("{}", buffer);
    println!("Duration: {:.3}s", duration.as_secs_f64());

    debug!("decoding {} frames", sample_count);
    let interleaved = buffer.get_all_samples()?;

    let mut channel = vec![0.0; sample_count as usize];
    buffer.channel_samples(options.channel, &interleaved, &mut channel)?;

    let peak = channel.iter().fold(0.0f64, |acc, s| acc.max(s.abs()));
    let rms = if channel.is_empty() {
        0.0
    } else {
        (channel.iter().map(|s| s * s).sum::<f64>() / channel.len() as f64).sqrt()
    };
    println!(
        "Channel {}: peak {:.1} dBFS, rms {:.1} dBFS",
        options.channel,
        to_dbfs(peak),
        to_dbfs(rms)
    );

    let Some(output_dir) = options.output_dir else {
        return Ok(());
    };

    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample".to_string());
    let filename = generate_filename(&stem, options.channel, options.raw, Local::now());
    let output_path = output_dir.join(&filename);

    if options.raw {
        write_raw(BufWriter::new(File::create(&output_path)?), &channel, &format)?;
    } else {
        write_wav(&output_path, &channel, &format)?;
    }

    info!("wrote {}", output_path.display());
    println!("Saved: {}", filename);
    Ok(())
}

fn to_dbfs(level: f64) -> f64 {
    if level > 0.0 {
        20.0 * level.log10()
    } else {
        f64::NEG_INFINITY
    }
}
