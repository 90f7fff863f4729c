//! CLI command implementations.

pub mod common;
pub mod envelope;
pub mod params;
pub mod presets;
pub mod process;
pub mod waveshape;
