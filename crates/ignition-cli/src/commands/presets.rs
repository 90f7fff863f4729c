//! Preset management commands.
//!
//! Provides commands to list, show and save presets.

use super::common::ParamArgs;
use anyhow::Context;
use clap::{Args, Subcommand};
use ignition_config::{
    Preset, ensure_user_presets_dir, factory_presets, list_user_presets, load_preset,
    preset_name_from_path, user_presets_dir,
};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save parameter settings as a user preset
    Save {
        /// Name for the new preset
        name: String,

        #[command(flatten)]
        params: ParamArgs,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => {
            list_presets(factory, user);
            Ok(())
        }
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            params,
            description,
            force,
        } => save_preset(&name, &params, description, force),
    }
}

fn list_presets(factory_only: bool, user_only: bool) {
    let show_factory = !user_only;
    let show_user = !factory_only;

    if show_factory {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if show_user {
        println!("User Presets:");
        println!("=============");
        let user_presets = list_user_presets();
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: ignition presets save <name> --param drive=6\n");
        } else {
            for path in user_presets {
                let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".to_string());
                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {name:20} - {desc}");
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), %err, "unreadable preset");
                        println!("  {name:20} - (error loading)");
                    }
                }
            }
        }
        println!();
    }
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {desc}");
        println!();
    }

    println!("Sample Rate: {} Hz", preset.sample_rate);
    println!();

    if preset.params.is_empty() {
        println!("Parameters: (all defaults)");
    } else {
        println!("Parameters ({}):", preset.params.len());
        for (key, value) in &preset.params {
            println!("  {key:16} = {value}");
        }
    }
    println!();

    let chain = preset
        .to_chain_params()
        .with_context(|| format!("preset '{}' has invalid parameters", preset.name))?;
    println!(
        "Chain: {} drive {:.2}, mix {:.0}%",
        chain.algorithm,
        chain.drive,
        chain.mix * 100.0
    );

    Ok(())
}

fn save_preset(
    name: &str,
    params: &ParamArgs,
    description: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let dir = ensure_user_presets_dir()?;
    let preset_path = dir.join(format!("{name}.toml"));

    if preset_path.exists() && !force {
        anyhow::bail!("Preset '{name}' already exists. Use --force to overwrite.");
    }

    let values = params.build()?;
    let mut preset = Preset::from_params(name, &values);
    preset.description = description;
    preset.save(&preset_path)?;

    println!("Saved preset '{}' to {}", name, preset_path.display());
    println!("Presets directory: {}", user_presets_dir().display());
    Ok(())
}
