//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use ignition_effects::params::{self, PARAM_DESCRIPTORS};
use ignition_effects::{AtomicParams, ChainParams, PARAM_COUNT};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_params};
use crate::value::format_param_value;

/// A named set of chain parameter values.
///
/// Parameters not listed keep their defaults. Values are strings so that
/// units and names can be used (see [`parse_param_value`](crate::parse_param_value)).
///
/// # TOML Format
///
/// ```toml
/// name = "Crunch"
/// description = "Envelope-pushed tube drive"
/// sample_rate = 48000
///
/// [params]
/// drive = "6"
/// algorithm = "tube"
/// post_on = "on"
/// post_cutoff = "6kHz"
/// mix = "80%"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Parameter values keyed by string id.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a new preset with every parameter at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            params: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set a parameter value.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Capture the current values of `params`.
    ///
    /// Only values that differ from their defaults are written.
    pub fn from_params(name: impl Into<String>, params: &AtomicParams) -> Self {
        let values = params.values();
        let mut preset = Self::new(name);
        for (index, desc) in PARAM_DESCRIPTORS.iter().enumerate() {
            let value = values[index];
            if value.to_bits() != desc.default.to_bits() {
                preset
                    .params
                    .insert(desc.string_id.to_string(), format_param_value(index, value));
            }
        }
        preset
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating the parent directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve every listed parameter to `(index, value)`.
    ///
    /// # Errors
    ///
    /// All unknown names, unparsable values and out-of-range values.
    pub fn resolve(&self) -> ValidationResult<Vec<(usize, f32)>> {
        validate_params(
            self.params
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }

    /// Raw values for every parameter: defaults overlaid with this preset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] if any parameter fails to resolve.
    pub fn values(&self) -> Result<[f32; PARAM_COUNT], ConfigError> {
        let mut values = params::default_values();
        for (index, value) in self.resolve()? {
            values[index] = value;
        }
        Ok(values)
    }

    /// Reset `params` to defaults and apply this preset.
    ///
    /// Nothing is written if validation fails.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] if any parameter fails to resolve.
    pub fn apply(&self, params: &AtomicParams) -> Result<(), ConfigError> {
        let values = self.values()?;
        for (index, value) in values.into_iter().enumerate() {
            params.set(index, value);
        }
        Ok(())
    }

    /// Decode this preset into a chain parameter snapshot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] if any parameter fails to resolve.
    pub fn to_chain_params(&self) -> Result<ChainParams, ConfigError> {
        Ok(ChainParams::from_values(&self.values()?))
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ignition_effects::{Algorithm, FilterRouting, FilterSlot};

    #[test]
    fn test_preset_new() {
        let preset = Preset::new("Test Preset");
        assert_eq!(preset.name, "Test Preset");
        assert!(preset.description.is_none());
        assert_eq!(preset.sample_rate, 48000);
        assert!(preset.params.is_empty());
        assert_eq!(preset.to_chain_params().unwrap(), ChainParams::default());
    }

    #[test]
    fn test_preset_from_toml() {
        let toml = r#"
name = "Test"
description = "A test preset"
sample_rate = 44100

[params]
drive = "8"
algorithm = "fuzz"
filter_routing = "2"
post_cutoff = "2.5kHz"
env_attack = "3ms"
"#;
        let preset = Preset::from_toml(toml).unwrap();
        assert_eq!(preset.name, "Test");
        assert_eq!(preset.description.as_deref(), Some("A test preset"));
        assert_eq!(preset.sample_rate, 44100);

        let p = preset.to_chain_params().unwrap();
        assert_eq!(p.drive, 8.0);
        assert_eq!(p.algorithm, Algorithm::Fuzz);
        assert_eq!(p.routing, FilterRouting::Exclusive(FilterSlot::Post));
        assert_eq!(p.post.cutoff_hz, 2500.0);
        assert_eq!(p.attack_ms, 3.0);
    }

    #[test]
    fn test_minimal_toml_defaults() {
        let preset = Preset::from_toml("name = \"Bare\"").unwrap();
        assert_eq!(preset.sample_rate, 48000);
        assert!(preset.params.is_empty());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            Preset::from_toml("name = "),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_apply_resets_unlisted_params() {
        let params = AtomicParams::new();
        params.set(params::GATE, 0.4);
        params.set(params::DRIVE, 12.0);

        Preset::new("p")
            .with_param("drive", "3")
            .apply(&params)
            .unwrap();
        assert_eq!(params.get(params::DRIVE), Some(3.0));
        assert_eq!(params.get(params::GATE), Some(0.0));
    }

    #[test]
    fn test_apply_invalid_leaves_params_untouched() {
        let params = AtomicParams::new();
        params.set(params::DRIVE, 12.0);

        let err = Preset::new("p")
            .with_param("gate", "0.5")
            .with_param("volume", "1")
            .apply(&params)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(params.get(params::DRIVE), Some(12.0));
        assert_eq!(params.get(params::GATE), Some(0.0));
    }

    #[test]
    fn test_from_params_captures_changes() {
        let params = AtomicParams::new();
        params.set(params::DRIVE, 7.5);
        params.set(params::ALGORITHM, 3.0);
        params.set(params::POST_ON, 1.0);

        let preset = Preset::from_params("Captured", &params);
        assert_eq!(preset.params.len(), 3);
        assert_eq!(preset.params["algorithm"], "rectify");
        assert_eq!(preset.params["post_on"], "on");

        let restored = AtomicParams::new();
        preset.apply(&restored).unwrap();
        assert_eq!(restored.values(), params.values());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let preset = Preset::new("Round")
            .with_description("trip")
            .with_param("mix", "50%")
            .with_param("drive", "2");
        let text = preset.to_toml().unwrap();
        assert!(text.contains("[params]"));
        assert_eq!(Preset::from_toml(&text).unwrap(), preset);
    }
}
