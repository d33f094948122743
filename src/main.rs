use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{RecvTimeoutError, bounded};

use rtfir::audio::{AudioDuplex, RealtimePriority, filter_wav_file};
use rtfir::config::{ChannelRole, FilterVariant, RtFirConfig};
use rtfir::fir::CoefficientSet;
use rtfir::processing::BlockProcessor;

#[derive(Parser, Debug)]
#[command(name = "rtfir")]
#[command(about = "Real-time stereo FIR filter", long_about = None)]
struct Args {
    /// Filter engine: 0 = direct, 1 = symmetric, 2 = transposed
    variant: FilterVariant,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Channel to filter; the other channel passes through unchanged
    #[arg(long, value_enum)]
    filtered_channel: Option<ChannelRole>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Host block size in frames
    #[arg(short, long)]
    buffer_size: Option<usize>,

    /// Filter this stereo WAV file instead of the live audio devices
    #[arg(short, long, requires = "output")]
    input: Option<PathBuf>,

    /// Destination for the filtered WAV file
    #[arg(short, long, requires = "input")]
    output: Option<PathBuf>,

    /// Seconds between hand-off statistics reports
    #[arg(long, default_value_t = 5.0)]
    report_interval: f32,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = build_config(&args)?;
    let coeffs = CoefficientSet::load();

    if config.filter.variant == FilterVariant::Symmetric && !coeffs.is_symmetric() {
        log::warn!("Coefficients are not symmetric; the symmetric engine will not match direct form");
    }

    let processor = BlockProcessor::from_config(&config.filter, &coeffs);
    eprintln!(
        "Running {} engine ({} taps, filtering {:?} channel)",
        processor.engine_name(),
        processor.num_taps(),
        processor.filtered_channel()
    );

    match (args.input, args.output) {
        (Some(input), Some(output)) => run_offline(processor, &input, &output, &config),
        _ => run_live(processor, &config, args.report_interval),
    }
}

fn build_config(args: &Args) -> anyhow::Result<RtFirConfig> {
    let mut config = match &args.config {
        Some(path) => RtFirConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RtFirConfig::default(),
    };

    config.filter.variant = args.variant;
    if let Some(channel) = args.filtered_channel {
        config.filter.filtered_channel = channel;
    }
    if let Some(rate) = args.sample_rate {
        config.audio.sample_rate = rate;
    }
    if let Some(size) = args.buffer_size {
        config.audio.buffer_size = size;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run_offline(
    mut processor: BlockProcessor,
    input: &Path,
    output: &Path,
    config: &RtFirConfig,
) -> anyhow::Result<()> {
    let summary = filter_wav_file(&mut processor, input, output, config.audio.buffer_size)
        .with_context(|| format!("Failed to filter {}", input.display()))?;

    println!("engine sample rate: {}", summary.sample_rate);
    println!(
        "Filtered {} frames in {} blocks -> {}",
        summary.frames,
        summary.blocks,
        output.display()
    );
    Ok(())
}

fn run_live(
    processor: BlockProcessor,
    config: &RtFirConfig,
    report_interval: f32,
) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = bounded(1);

    let duplex = AudioDuplex::new(&config.audio, processor, shutdown_tx)
        .context("Failed to start audio streams")?;

    println!("engine sample rate: {}", duplex.sample_rate());

    let interval = Duration::from_secs_f32(report_interval.max(0.1));
    let mut last_dropped = 0;
    let mut last_starved = 0;
    let mut priority = RealtimePriority::Pending;

    loop {
        match shutdown_rx.recv_timeout(interval) {
            Ok(err) => {
                log::error!("Audio host shut down: {}", err);
                break;
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("Audio streams closed");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                let current = duplex.counters().realtime_priority();
                if current != priority {
                    match current {
                        RealtimePriority::Promoted => {
                            log::info!("Audio callback running at real-time priority")
                        }
                        RealtimePriority::Unavailable => {
                            log::warn!("Could not set real-time priority on the audio callback")
                        }
                        RealtimePriority::Pending => {}
                    }
                    priority = current;
                }

                let dropped = duplex.counters().dropped_frames();
                let starved = duplex.counters().starved_frames();
                if dropped != last_dropped || starved != last_starved {
                    log::warn!(
                        "Hand-off xruns: {} input frames dropped, {} output frames starved",
                        dropped - last_dropped,
                        starved - last_starved
                    );
                } else {
                    log::debug!("No xruns in the last {:.1}s", interval.as_secs_f32());
                }
                last_dropped = dropped;
                last_starved = starved;
            }
        }
    }

    drop(duplex);
    std::process::exit(1);
}
