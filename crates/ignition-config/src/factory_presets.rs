//! Factory presets bundled with the ignition library.
//!
//! These presets are always available without external files and serve as
//! starting points for users.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "crunch",
    "tube_warmth",
    "fuzz_wah",
    "bitcrush",
    "rectifier",
    "parallel_grit",
];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("crunch", CRUNCH_PRESET),
    ("tube_warmth", TUBE_WARMTH_PRESET),
    ("fuzz_wah", FUZZ_WAH_PRESET),
    ("bitcrush", BITCRUSH_PRESET),
    ("rectifier", RECTIFIER_PRESET),
    ("parallel_grit", PARALLEL_GRIT_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "Every parameter at its default"
sample_rate = 48000
"#;

const CRUNCH_PRESET: &str = r#"
name = "Crunch"
description = "Envelope-pushed tube drive with a softened top end"
sample_rate = 48000

[params]
drive = "6"
drive_mod = "40%"
algorithm = "tube"
post_on = "on"
post_cutoff = "6kHz"
mix = "80%"
"#;

const TUBE_WARMTH_PRESET: &str = r#"
name = "Tube Warmth"
description = "Gentle saturation into a dark post-filter"
sample_rate = 48000

[params]
drive = "3"
algorithm = "tube"
post_on = "on"
post_cutoff = "4kHz"
post_resonance = "10%"
"#;

const FUZZ_WAH_PRESET: &str = r#"
name = "Fuzz Wah"
description = "Resonant pre-filter swept by the input envelope into fuzz"
sample_rate = 48000

[params]
drive = "12"
algorithm = "fuzz"
pre_on = "on"
pre_cutoff = "800Hz"
pre_resonance = "70%"
pre_cutoff_mod = "80%"
env_attack = "5ms"
env_release = "150ms"
"#;

const BITCRUSH_PRESET: &str = r#"
name = "Bitcrush"
description = "Sample-and-hold grit that thickens with playing dynamics"
sample_rate = 48000

[params]
drive = "8"
drive_mod = "50%"
algorithm = "downsample"
gate = "2%"
"#;

const RECTIFIER_PRESET: &str = r#"
name = "Rectifier"
description = "Octave-up rectification through an envelope-opened post-filter"
sample_rate = 48000

[params]
drive = "4"
algorithm = "rectify"
filter_routing = "2"
post_cutoff = "3kHz"
post_cutoff_mod = "50%"
"#;

const PARALLEL_GRIT_PRESET: &str = r#"
name = "Parallel Grit"
description = "Heavy clipping blended under the dry signal"
sample_rate = 48000

[params]
drive = "15"
algorithm = "hardclip"
post_on = "on"
post_cutoff = "5kHz"
mix = "40%"
"#;

/// Get all factory presets.
///
/// Presets that fail to parse are skipped; the bundled set always parses.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name (case-insensitive, `-` and spaces read as `_`).
///
/// # Example
///
/// ```rust
/// use ignition_config::get_factory_preset;
///
/// let preset = get_factory_preset("Tube-Warmth").unwrap();
/// assert_eq!(preset.name, "Tube Warmth");
/// assert!(get_factory_preset("nope").is_none());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let key = normalize(name);
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| *preset_name == key)
        .and_then(|(_, toml)| Preset::from_toml(toml).ok())
}

/// Get the names of all factory presets.
pub fn factory_preset_names() -> &'static [&'static str] {
    FACTORY_PRESET_NAMES
}

/// Check if a name refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    let key = normalize(name);
    FACTORY_PRESET_NAMES.contains(&key.as_str())
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
