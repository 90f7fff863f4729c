//! Integration tests for ignition-config preset files.

use ignition_config::{
    ConfigError, Preset, ValidationError, factory_presets, parse_param_value, validate_preset,
};
use ignition_effects::params::{self, PARAM_DESCRIPTORS};
use ignition_effects::{Algorithm, AtomicParams, SignalChain};
use tempfile::TempDir;

#[test]
fn save_and_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("dir").join("grit.toml");

    let preset = Preset::new("Grit")
        .with_description("saved by test")
        .with_sample_rate(44100)
        .with_param("algorithm", "fuzz")
        .with_param("drive", "9.5")
        .with_param("post_on", "on");
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
    let p = loaded.to_chain_params().unwrap();
    assert_eq!(p.algorithm, Algorithm::Fuzz);
    assert_eq!(p.drive, 9.5);
    assert!(p.routing.post_enabled());
}

#[test]
fn load_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");
    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn capture_save_load_apply() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("captured.toml");

    let live = AtomicParams::new();
    live.set_by_id("drive", 4.25);
    live.set_by_id("filter_routing", 1.0);
    live.set_by_id("pre_cutoff", 1500.0);
    live.set_by_id("env_release", 80.0);
    Preset::from_params("Captured", &live).save(&path).unwrap();

    let restored = AtomicParams::new();
    Preset::load(&path).unwrap().apply(&restored).unwrap();
    assert_eq!(restored.snapshot(), live.snapshot());
}

#[test]
fn invalid_preset_collects_every_problem() {
    let preset = Preset::from_toml(
        r#"
name = "Broken"

[params]
drive = "100"
colour = "red"
mix = "half"
"#,
    )
    .unwrap();

    let Err(ValidationError::Multiple(errors)) = validate_preset(&preset) else {
        panic!("expected multiple errors");
    };
    assert_eq!(errors.len(), 3);
    assert!(matches!(
        preset.to_chain_params(),
        Err(ConfigError::Validation(ValidationError::Multiple(_)))
    ));
}

#[test]
fn factory_presets_drive_a_chain() {
    let params = AtomicParams::new();
    let mut chain = SignalChain::new(48000.0, 1).unwrap();
    let input: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

    for preset in factory_presets() {
        preset.apply(&params).unwrap();
        let mut block = input.clone();
        chain.reset();
        chain
            .process_block(&params.snapshot(), &mut [block.as_mut_slice()])
            .unwrap();
        assert!(
            block.iter().all(|s| s.is_finite()),
            "{} produced non-finite output",
            preset.name
        );
    }
}

#[test]
fn defaults_format_to_parsable_values() {
    for desc in &PARAM_DESCRIPTORS {
        let index = params::index_of(desc.string_id).unwrap();
        let text = ignition_config::format_param_value(index, desc.default);
        assert_eq!(parse_param_value(&text), Some(desc.default), "{}", desc.string_id);
    }
}
