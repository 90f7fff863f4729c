//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Waveshaping / Clipping
//!
//! Different transfer curves produce different harmonic characteristics:
//!
//! | Function | Character | Harmonics | Used by |
//! |----------|-----------|-----------|---------|
//! | [`hard_clip`] | Harsh, flat tops | Odd (many) | HardClip |
//! | [`asymmetric_clip`] | Warm, tube-like | Even + Odd | Tube |
//! | [`fuzz_clip`] | Steep, buzzy | Odd | Fuzz |
//! | [`rectify`] | Octave-up, DC shifted | Even (dense) | Rectify |
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Keep feedback state out of the subnormal range
//! - [`wet_dry_mix`] - Linear crossfade
//! - [`lerp`] - Linear interpolation / range mapping
//! - [`linear_to_db`] - Level conversion for metering

use libm::{expf, logf, tanhf};

/// Steepness of the [`fuzz_clip`] knee. Small-signal gain equals this value.
const FUZZ_STEEPNESS: f32 = 2.5;

/// Convert linear gain to decibels.
///
/// Values at or below zero are floored at -200 dB.
///
/// # Example
/// ```rust
/// use ignition_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Soft clip using hyperbolic tangent.
///
/// Smooth saturation that approaches ±1 asymptotically.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Hard clip to ±threshold range.
///
/// Abrupt limiting that creates flat tops on waveforms. Output is always in
/// `[-threshold, threshold]` for finite input.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Asymmetric soft clipping.
///
/// Positive and negative halves clip differently, producing
/// both even and odd harmonics (warmer, tube-like character).
/// The positive half saturates toward 1.0, the negative half toward -0.8.
#[inline]
pub fn asymmetric_clip(x: f32) -> f32 {
    if x >= 0.0 {
        // Positive: gentler clipping
        tanhf(x)
    } else {
        // Negative: harder clipping (reaches limit faster)
        tanhf(x * 1.5) / 1.5 * 1.2
    }
}

/// Exponential fuzz clipping.
///
/// `sign(x) · (1 − e^(−k·|x|))` with a steep knee. Symmetric, so it adds odd
/// harmonics only, and saturates much earlier than [`soft_clip`].
#[inline]
pub fn fuzz_clip(x: f32) -> f32 {
    let shaped = 1.0 - expf(-FUZZ_STEEPNESS * x.abs());
    if x < 0.0 { -shaped } else { shaped }
}

/// Full-wave rectification followed by soft saturation.
///
/// Folds the negative half upward (frequency doubling, strong DC offset) and
/// then bounds the result with `tanh`. Output is in `[0, 1)`.
#[inline]
pub fn rectify(x: f32) -> f32 {
    tanhf(x.abs())
}

/// Linear interpolation between two values.
///
/// Also used to map a normalized control in \[0, 1\] onto a range.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats (~1e-38 to 1e-45) cause severe CPU performance
/// degradation on most architectures (up to 100x slowdown). This function
/// replaces values below 1e-20 with zero, providing margin before the
/// IEEE 754 subnormal range begins.
///
/// Use this in recursive state (envelope followers, filter integrators)
/// where signal can decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Computes `mix · wet + (1 − mix) · dry`. Both endpoints are exact:
/// `mix <= 0.0` returns `dry` and `mix >= 1.0` returns `wet` bit-for-bit,
/// whatever the other side holds (including NaN or infinity).
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    if mix <= 0.0 {
        dry
    } else if mix >= 1.0 {
        wet
    } else {
        mix * wet + (1.0 - mix) * dry
    }
}
