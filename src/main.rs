use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod inspect;

/// Decode a 16 kHz mono voice clip and optionally extract a channel
#[derive(Parser, Debug)]
#[command(name = "pcm-sample")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input WAV file (or headerless PCM with --headerless)
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Treat the input as raw 16 kHz 16-bit mono little-endian PCM
    #[arg(long)]
    headerless: bool,

    /// Output directory for the extracted channel
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Channel to extract; input is always mono, so only 0 is accepted
    #[arg(short, long, default_value = "0")]
    channel: usize,

    /// Write headerless PCM instead of WAV
    #[arg(long)]
    raw: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let options = inspect::Options {
        output_dir: args.output_dir.as_deref(),
        channel: args.channel,
        raw: args.raw,
    };

    if args.headerless {
        let buffer = pcm_sample::input::open_raw(&args.input_file, pcm_sample::FormatDescriptor::SUPPORTED)?;
        inspect::process(buffer, &args.input_file, &options)?;
    } else {
        let buffer = pcm_sample::input::open_wav(&args.input_file)?;
        inspect::process(buffer, &args.input_file, &options)?;
    }

    Ok(())
}
