//! Envelope history command.
//!
//! Runs a file through the chain and prints the decimated pre-effect and
//! output envelopes that a UI would draw.

use super::common::ParamArgs;
use clap::Args;
use ignition_core::HISTORY_DECIMATION;
use ignition_io::{DEFAULT_BLOCK_SIZE, ProcessingEngine, read_wav};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args)]
pub struct EnvelopeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    params: ParamArgs,

    /// Processing block size
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    sample_rate: u32,
    frames: usize,
    decimation: u32,
    input: Vec<f32>,
    output: Vec<f32>,
}

pub fn run(args: &EnvelopeArgs) -> anyhow::Result<()> {
    let params = args.params.build()?;
    let (mut buffer, spec) = read_wav(&args.input)?;

    let mut engine = ProcessingEngine::new(
        spec.sample_rate as f32,
        buffer.channel_count(),
        args.block_size,
    )?;
    tracing::info!(
        sample_rate = spec.sample_rate,
        channels = buffer.channel_count(),
        frames = buffer.frames(),
        "tracing envelope"
    );
    engine.process_buffer(&params.snapshot(), &mut buffer, |_| {})?;

    let visualizer = engine.visualizer();
    let report = Report {
        sample_rate: spec.sample_rate,
        frames: buffer.frames(),
        decimation: HISTORY_DECIMATION,
        input: visualizer.envelope_history(),
        output: visualizer.post_envelope_history(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Envelope: {} frames at {} Hz, one point every {} samples",
        report.frames, report.sample_rate, report.decimation
    );
    println!();
    println!("  {:>6}  {:>10}  {:>10}", "point", "input", "output");
    for (i, (pre, post)) in report.input.iter().zip(&report.output).enumerate() {
        println!("  {i:>6}  {pre:>10.5}  {post:>10.5}");
    }
    Ok(())
}
