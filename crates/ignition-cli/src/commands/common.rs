//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use ignition_config::{load_preset, validate_params};
use ignition_effects::AtomicParams;

/// Preset and per-parameter overrides, shared by every command that runs the
/// chain.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// Preset name or path (TOML)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Parameter override (e.g. "drive=6", "post_cutoff=4kHz", "algorithm=fuzz")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    pub param: Vec<(String, String)>,
}

impl ParamArgs {
    /// Defaults, overlaid with the preset, overlaid with `--param` values.
    pub fn build(&self) -> anyhow::Result<AtomicParams> {
        let params = AtomicParams::new();

        if let Some(name) = &self.preset {
            let preset = load_preset(name).with_context(|| {
                format!("Preset '{name}' not found. Use 'ignition presets list' to see available presets.")
            })?;
            preset
                .apply(&params)
                .with_context(|| format!("invalid preset '{}'", preset.name))?;
            tracing::info!(preset = %preset.name, "loaded preset");
        }

        let overrides = validate_params(
            self.param
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
        .context("invalid --param")?;
        for (index, value) in overrides {
            params.set(index, value);
        }
        Ok(params)
    }
}

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{s}' (expected key=value)"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}
