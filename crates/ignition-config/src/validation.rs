//! Parameter and preset validation.
//!
//! Names are checked against the chain's parameter table, values are parsed
//! with [`parse_param_value`] and range-checked against the parameter's
//! descriptor.
//!
//! # Example
//!
//! ```rust
//! use ignition_config::{ValidationError, resolve_param};
//! use ignition_effects::params::POST_CUTOFF;
//!
//! assert_eq!(resolve_param("post_cutoff", "6kHz"), Ok((POST_CUTOFF, 6000.0)));
//! assert!(matches!(
//!     resolve_param("drive", "40"),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use crate::{Preset, parse_param_value};
use ignition_effects::params;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Resolve a `name = value` pair to a parameter index and plain value.
///
/// # Errors
///
/// [`ValidationError::UnknownParameter`] if no parameter has this string id,
/// [`ValidationError::InvalidFormat`] if the value does not parse and
/// [`ValidationError::OutOfRange`] if it falls outside the descriptor range.
pub fn resolve_param(name: &str, value: &str) -> ValidationResult<(usize, f32)> {
    let index =
        params::index_of(name).ok_or_else(|| ValidationError::UnknownParameter(name.to_string()))?;
    let parsed = parse_param_value(value).ok_or_else(|| ValidationError::InvalidFormat {
        param: name.to_string(),
        reason: format!("cannot parse '{value}'"),
    })?;

    let desc = &params::PARAM_DESCRIPTORS[index];
    if !desc.contains(parsed) {
        return Err(ValidationError::OutOfRange {
            param: name.to_string(),
            value: parsed,
            min: desc.min,
            max: desc.max,
        });
    }
    Ok((index, parsed))
}

/// Resolve every pair, collecting all failures instead of stopping at the
/// first.
///
/// A single failure is returned as is; several are wrapped in
/// [`ValidationError::Multiple`].
///
/// # Errors
///
/// Any error [`resolve_param`] reports, for any pair.
pub fn validate_params<'a, I>(pairs: I) -> ValidationResult<Vec<(usize, f32)>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut resolved = Vec::new();
    let mut errors = Vec::new();
    for (name, value) in pairs {
        match resolve_param(name, value) {
            Ok(pair) => resolved.push(pair),
            Err(err) => errors.push(err),
        }
    }

    match errors.len() {
        0 => Ok(resolved),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate every parameter of a preset.
///
/// # Errors
///
/// See [`validate_params`].
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    validate_params(
        preset
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    )
    .map(|_| ())
}
