use std::time::Instant;

use clap::Parser;
use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rolling_stats::Stats;
use serde::Serialize;

use rtfir::config::{ChannelRole, FilterVariant};
use rtfir::constants::STEREO_CHANNELS;
use rtfir::fir::CoefficientSet;
use rtfir::processing::BlockProcessor;

#[derive(Parser, Debug)]
#[command(name = "fir_bench")]
#[command(about = "Compare per-block cost and output of the FIR engines", long_about = None)]
struct Args {
    /// Use a synthetic symmetric filter of this many taps instead of the built-in table
    #[arg(short = 'n', long)]
    taps: Option<usize>,

    /// Block size in frames
    #[arg(short, long, default_value_t = 256)]
    block_size: usize,

    /// Number of blocks per engine
    #[arg(long, default_value_t = 2000)]
    blocks: usize,

    /// Sample rate used to express the real-time budget
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,

    /// Seed for the generated test input
    #[arg(long, default_value_t = 0x1234_5678)]
    seed: u64,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl StatsSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct EngineReport {
    variant: String,
    taps: usize,
    block_us: Option<StatsSummary>,
    ns_per_sample: f32,
    /// Mean block time as a fraction of the block's real-time duration
    budget_fraction: f32,
    /// Largest absolute output difference from the direct engine
    max_deviation: f32,
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

    if args.block_size == 0 || args.blocks == 0 {
        anyhow::bail!("block size and block count must be positive");
    }

    let coeffs = match args.taps {
        Some(n) => CoefficientSet::from_taps(hann_taps(n)),
        None => CoefficientSet::load(),
    };
    log::info!(
        "Benchmarking {} taps, {} blocks of {} frames",
        coeffs.len(),
        args.blocks,
        args.block_size
    );

    let input = test_input(args.block_size * args.blocks, args.seed);
    let block_secs = args.block_size as f32 / args.sample_rate as f32;

    let mut reference: Option<Vec<f32>> = None;
    let mut reports = Vec::new();

    for variant in FilterVariant::ALL {
        let (stats, output) = bench_variant(variant, &coeffs, &input, args.block_size);

        let max_deviation = match &reference {
            Some(expected) => max_filtered_deviation(&output, expected),
            None => 0.0,
        };
        if variant == FilterVariant::Direct {
            reference = Some(output);
        }

        let samples = (args.block_size * stats.count) as f32;
        let total_us = stats.mean * stats.count as f32;
        reports.push(EngineReport {
            variant: variant.to_string(),
            taps: coeffs.len(),
            ns_per_sample: if samples > 0.0 {
                total_us * 1000.0 / samples
            } else {
                0.0
            },
            budget_fraction: stats.mean / (block_secs * 1e6),
            block_us: StatsSummary::from_stats(&stats),
            max_deviation,
        });
    }

    match args.format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    Ok(())
}

/// Time each block of `input` through one engine, returning block stats
/// and the processed interleaved signal
fn bench_variant(
    variant: FilterVariant,
    coeffs: &CoefficientSet,
    input: &[f32],
    block_size: usize,
) -> (Stats<f32>, Vec<f32>) {
    let mut processor = BlockProcessor::with_variant(variant, coeffs, ChannelRole::Left);
    let mut output = input.to_vec();
    let mut stats: Stats<f32> = Stats::new();

    for block in output.chunks_mut(block_size * STEREO_CHANNELS as usize) {
        let start = Instant::now();
        processor.process_interleaved(block);
        stats.update(start.elapsed().as_secs_f32() * 1e6);
    }

    log::debug!("{}: mean {:.2} us/block", variant, stats.mean);
    (stats, output)
}

fn max_filtered_deviation(output: &[f32], expected: &[f32]) -> f32 {
    output
        .iter()
        .zip(expected)
        .step_by(2)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f32::max)
}

/// Interleaved stereo noise in [-1, 1); the same seed gives the same signal
fn test_input(frames: usize, seed: u64) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..frames * STEREO_CHANNELS as usize)
        .map(|_| rng.random::<f32>() * 2.0 - 1.0)
        .collect()
}

/// Symmetric Hann-windowed averaging taps with unity DC gain
fn hann_taps(n: usize) -> Vec<f32> {
    let taps: Vec<f32> = (0..n)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * (i + 1) as f32 / (n + 1) as f32;
            0.5 - 0.5 * phase.cos()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    if sum > 0.0 {
        taps.iter().map(|t| t / sum).collect()
    } else {
        taps
    }
}

fn print_text(reports: &[EngineReport]) {
    println!(
        "{:<12} {:>6} {:>10} {:>10} {:>10} {:>10} {:>8} {:>12}",
        "engine", "taps", "mean us", "std us", "max us", "ns/sample", "budget", "max dev"
    );
    println!("{}", "-".repeat(86));
    for r in reports {
        let (mean, std_dev, max) = r
            .block_us
            .as_ref()
            .map_or((0.0, 0.0, 0.0), |s| (s.mean, s.std_dev, s.max));
        println!(
            "{:<12} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>7.2}% {:>12.3e}",
            r.variant,
            r.taps,
            mean,
            std_dev,
            max,
            r.ns_per_sample,
            r.budget_fraction * 100.0,
            r.max_deviation
        );
    }
}
