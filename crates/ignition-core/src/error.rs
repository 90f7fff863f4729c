//! Configuration errors for DSP primitives.
//!
//! Raised only at configuration boundaries (block rate or setup), never from
//! the per-sample path. A rejected configuration leaves the previous valid
//! state untouched.

/// Errors returned when a configuration value would make coefficient
/// derivation undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Sample rate must be finite and greater than zero.
    InvalidSampleRate(f32),
    /// Attack time (seconds) must be finite and greater than zero.
    InvalidAttack(f32),
    /// Release time (seconds) must be finite and greater than zero.
    InvalidRelease(f32),
    /// At least one audio channel is required.
    InvalidChannelCount(usize),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSampleRate(sr) => {
                write!(f, "sample rate must be positive and finite, got {sr}")
            }
            Self::InvalidAttack(t) => {
                write!(f, "attack time must be positive and finite, got {t} s")
            }
            Self::InvalidRelease(t) => {
                write!(f, "release time must be positive and finite, got {t} s")
            }
            Self::InvalidChannelCount(n) => {
                write!(f, "channel count must be at least 1, got {n}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Returns `Ok(value)` when `value` is finite and strictly positive.
#[inline]
pub(crate) fn positive(value: f32, err: fn(f32) -> ConfigError) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(err(value))
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ConfigError::InvalidSampleRate(0.0).to_string(),
            "sample rate must be positive and finite, got 0"
        );
        assert!(
            ConfigError::InvalidAttack(-1.0)
                .to_string()
                .contains("attack")
        );
        assert!(
            ConfigError::InvalidChannelCount(0)
                .to_string()
                .contains("channel")
        );
    }

    #[test]
    fn positive_rejects_nan_and_zero() {
        assert!(positive(f32::NAN, ConfigError::InvalidAttack).is_err());
        assert!(positive(0.0, ConfigError::InvalidAttack).is_err());
        assert!(positive(f32::INFINITY, ConfigError::InvalidAttack).is_err());
        assert_eq!(positive(0.5, ConfigError::InvalidAttack), Ok(0.5));
    }
}
