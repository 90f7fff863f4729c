//! Parsing and formatting of human-friendly parameter values.

use ignition_effects::Algorithm;
use ignition_effects::params::{self, ALGORITHM};

/// Parse a parameter value from a string.
///
/// Supports:
/// - Plain numbers: `"0.5"`, `"12"`
/// - Percentages, mapped to `0..1`: `"80%"` → `0.8`
/// - Frequencies: `"440Hz"`, `"6kHz"` → Hz
/// - Times, in milliseconds: `"15ms"` → `15`, `"1.5s"` → `1500`
/// - Switches: `on`/`off`, `true`/`false`
/// - Algorithm names: `hardclip`, `tube`, `fuzz`, `rectify`, `downsample`
///
/// Units are case-insensitive. Non-finite numbers are rejected.
///
/// # Example
///
/// ```rust
/// use ignition_config::parse_param_value;
///
/// assert_eq!(parse_param_value("6kHz"), Some(6000.0));
/// assert_eq!(parse_param_value(" 80% "), Some(0.8));
/// assert_eq!(parse_param_value("2s"), Some(2000.0));
/// assert_eq!(parse_param_value("Fuzz"), Some(2.0));
/// assert_eq!(parse_param_value("on"), Some(1.0));
/// assert_eq!(parse_param_value("loud"), None);
/// ```
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();

    match value.as_str() {
        "on" | "true" => return Some(1.0),
        "off" | "false" => return Some(0.0),
        _ => {}
    }

    if let Some(algorithm) = Algorithm::from_name(&value) {
        return Some(algorithm.index() as f32);
    }

    if let Some(pct) = value.strip_suffix('%') {
        return number(pct).map(|v| v / 100.0);
    }

    if let Some(khz) = value.strip_suffix("khz") {
        return number(khz).map(|v| v * 1000.0);
    }

    if let Some(hz) = value.strip_suffix("hz") {
        return number(hz);
    }

    if let Some(ms) = value.strip_suffix("ms") {
        return number(ms);
    }

    if let Some(s) = value.strip_suffix('s') {
        return number(s).map(|v| v * 1000.0);
    }

    number(&value)
}

fn number(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Format a parameter value for a preset file.
///
/// The algorithm is written by name and switches as `on`/`off`; everything
/// else as a plain number. The result parses back to the same value.
///
/// ```rust
/// use ignition_config::format_param_value;
/// use ignition_effects::params::{ALGORITHM, DRIVE, PRE_ON};
///
/// assert_eq!(format_param_value(ALGORITHM, 1.0), "tube");
/// assert_eq!(format_param_value(PRE_ON, 1.0), "on");
/// assert_eq!(format_param_value(DRIVE, 6.5), "6.5");
/// ```
pub fn format_param_value(index: usize, value: f32) -> String {
    match params::descriptor(index) {
        Some(_) if index == ALGORITHM => {
            params::decode_selector(value, 4)
                .map(Algorithm::from_index)
                .unwrap_or_default()
                .name()
                .to_string()
        }
        Some(desc) if desc.is_boolean() => {
            if params::decode_bool(value) { "on" } else { "off" }.to_string()
        }
        _ => value.to_string(),
    }
}
