//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use ignition_config::format_param_value;
use ignition_effects::params::PARAM_DESCRIPTORS;
use serde::Serialize;

#[derive(Args)]
pub struct ParamsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ParamEntry {
    id: &'static str,
    name: &'static str,
    group: &'static str,
    min: f32,
    max: f32,
    default: String,
    unit: &'static str,
}

pub fn run(args: &ParamsArgs) -> anyhow::Result<()> {
    let entries: Vec<ParamEntry> = PARAM_DESCRIPTORS
        .iter()
        .enumerate()
        .map(|(index, desc)| ParamEntry {
            id: desc.string_id,
            name: desc.name,
            group: desc.group,
            min: desc.min,
            max: desc.max,
            default: format_param_value(index, desc.default),
            unit: desc.unit.suffix().trim(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Parameters");
    println!("==========");
    println!();
    println!(
        "  {:16}  {:24}  {:20}  {:10}  {}",
        "Id", "Name", "Range", "Default", "Unit"
    );
    println!(
        "  {:16}  {:24}  {:20}  {:10}  {}",
        "--", "----", "-----", "-------", "----"
    );

    let mut group = "";
    for entry in &entries {
        if entry.group != group {
            group = entry.group;
            println!("  [{group}]");
        }
        println!(
            "  {:16}  {:24}  {:20}  {:10}  {}",
            entry.id,
            entry.name,
            format!("{} - {}", entry.min, entry.max),
            entry.default,
            entry.unit
        );
    }

    println!();
    println!("Values accept units: 80%, 6kHz, 15ms, 1.5s, on/off, and algorithm names.");
    Ok(())
}
