//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or applying presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No preset file, user preset or factory preset has this name
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Preset parameters failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;
    use std::error::Error;

    fn not_found() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn io_variants_carry_path_and_source() {
        let cases = [
            (ConfigError::read_file("/p/a.toml", not_found()), "failed to read file"),
            (ConfigError::write_file("/p/a.toml", not_found()), "failed to write file"),
            (ConfigError::create_dir("/p/a.toml", not_found()), "failed to create directory"),
        ];
        for (err, prefix) in cases {
            let msg = err.to_string();
            assert!(msg.starts_with(prefix), "got: {msg}");
            assert!(msg.contains("/p/a.toml"), "got: {msg}");
            assert!(err.source().is_some());
        }
    }

    #[test]
    fn preset_not_found_display() {
        let err = ConfigError::PresetNotFound("warm".to_string());
        assert_eq!(err.to_string(), "preset not found: warm");
        assert!(err.source().is_none());
    }

    #[test]
    fn validation_wraps() {
        let err: ConfigError = ValidationError::UnknownParameter("volume".to_string()).into();
        assert_eq!(
            err.to_string(),
            "validation failed: unknown parameter 'volume'"
        );
    }
}
