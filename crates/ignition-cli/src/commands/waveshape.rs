//! Transfer curve preview command.

use super::common::ParamArgs;
use clap::Args;
use ignition_effects::DistortionEngine;
use serde::Serialize;

#[derive(Args)]
pub struct WaveshapeArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Envelope modulation amount applied on top of the drive
    #[arg(short, long, default_value_t = 0.0)]
    modulation: f32,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Curve {
    algorithm: &'static str,
    drive: f32,
    modulation: f32,
    points: Vec<[f32; 2]>,
}

pub fn run(args: &WaveshapeArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.modulation.is_finite() && args.modulation >= 0.0,
        "modulation must be a finite, non-negative number"
    );

    let chain = args.params.build()?.snapshot();
    let mut engine = DistortionEngine::new();
    engine.set_drive(chain.drive);
    engine.set_algorithm(chain.algorithm);
    engine.set_modulation(args.modulation);

    let curve = Curve {
        algorithm: chain.algorithm.name(),
        drive: engine.drive(),
        modulation: engine.modulation(),
        points: engine
            .waveshape_preview()
            .iter()
            .map(|&(x, y)| [x, y])
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&curve)?);
        return Ok(());
    }

    println!(
        "Waveshape: {} (drive {:.2}, modulation {:.2}, effective {:.2})",
        curve.algorithm,
        curve.drive,
        curve.modulation,
        engine.effective_drive()
    );
    println!();
    println!("  {:>8}  {:>8}", "input", "output");
    for [x, y] in &curve.points {
        println!("  {x:>8.4}  {y:>8.4}");
    }
    Ok(())
}
