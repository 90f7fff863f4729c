//! File-based processing command.

use super::common::ParamArgs;
use clap::Args;
use ignition_core::linear_to_db;
use ignition_io::{DEFAULT_BLOCK_SIZE, ProcessingEngine, WavSpec, read_wav, write_wav};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    params: ParamArgs,

    /// Processing block size
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(args.bit_depth, 16 | 24 | 32),
        "unsupported bit depth {} (use 16, 24 or 32)",
        args.bit_depth
    );
    anyhow::ensure!(args.block_size > 0, "block size must be at least 1");

    let params = args.params.build()?;

    println!("Reading {}...", args.input.display());
    let (mut buffer, spec) = read_wav(&args.input)?;
    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        buffer.channel_count(),
        buffer.frames(),
        spec.sample_rate,
        buffer.frames() as f32 / spec.sample_rate as f32
    );

    let chain_params = params.snapshot();
    println!(
        "Processing: {} drive {:.2}, mix {:.0}%",
        chain_params.algorithm,
        chain_params.drive,
        chain_params.mix * 100.0
    );

    let input_rms = buffer.rms();
    let input_peak = buffer.peak();

    let mut engine = ProcessingEngine::new(
        spec.sample_rate as f32,
        buffer.channel_count(),
        args.block_size,
    )?;
    tracing::info!(
        sample_rate = spec.sample_rate,
        channels = buffer.channel_count(),
        frames = buffer.frames(),
        block_size = engine.block_size(),
        "rendering"
    );

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(buffer.frames() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    engine.process_buffer(&chain_params, &mut buffer, |done| pb.set_position(done as u64))?;
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(input_rms),
        linear_to_db(input_peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(buffer.rms()),
        linear_to_db(buffer.peak())
    );

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth,
        ..spec
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &buffer, out_spec)?;
    println!("Done!");

    Ok(())
}
