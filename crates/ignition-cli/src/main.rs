//! Ignition CLI - command-line interface for the envelope-driven distortion engine.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ignition")]
#[command(author, version, about = "Envelope-driven distortion engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the signal chain
    Process(commands::process::ProcessArgs),

    /// List every chain parameter with its range and default
    Params(commands::params::ParamsArgs),

    /// List, show and save presets
    Presets(commands::presets::PresetsArgs),

    /// Print the distortion transfer curve
    Waveshape(commands::waveshape::WaveshapeArgs),

    /// Run a file through the chain and print its envelope histories
    Envelope(commands::envelope::EnvelopeArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Params(args) => commands::params::run(&args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Waveshape(args) => commands::waveshape::run(&args),
        Commands::Envelope(args) => commands::envelope::run(&args),
    }
}
