//! Preset and parameter configuration for the ignition distortion engine.
//!
//! # Features
//!
//! - **Preset System**: Load and save chain settings as TOML files
//! - **Value Parsing**: Human-friendly values such as `"6kHz"`, `"80%"`, `"tube"`
//! - **Validation**: Unknown names, unparsable values and out-of-range values
//! - **Paths**: Platform-specific preset directory
//! - **Factory Presets**: Built-in starting points
//!
//! # Example
//!
//! ```rust
//! use ignition_config::Preset;
//! use ignition_effects::{Algorithm, AtomicParams};
//!
//! let preset = Preset::new("Crunch")
//!     .with_param("drive", "6")
//!     .with_param("algorithm", "tube")
//!     .with_param("mix", "80%");
//!
//! let params = AtomicParams::new();
//! preset.apply(&params).unwrap();
//!
//! let snapshot = params.snapshot();
//! assert_eq!(snapshot.drive, 6.0);
//! assert_eq!(snapshot.algorithm, Algorithm::Tube);
//! assert_eq!(snapshot.mix, 0.8);
//! ```

mod error;
mod preset;
mod value;

/// Platform-specific paths for presets.
pub mod paths;

/// Parameter and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, load_preset, preset_name_from_path,
    user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use validation::{
    ValidationError, ValidationResult, resolve_param, validate_params, validate_preset,
};
pub use value::{format_param_value, parse_param_value};
