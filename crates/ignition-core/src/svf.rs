//! State Variable Filter implementation.
//!
//! A 2-pole resonant filter with lowpass, highpass and bandpass outputs from
//! the same state. Well-suited for modulation because cutoff can change every
//! sample without instability.
//!
//! # Topology
//!
//! Implements the Topology-Preserving Transform (TPT) SVF after Zavalishin,
//! "The Art of VA Filter Design" (2012). The trapezoidal integrator
//! discretization preserves the analog prototype's frequency response and
//! stays stable for any cutoff below Nyquist.
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f32::consts::PI;
use libm::tanf;

use crate::Effect;
use crate::flush_denormal;

/// Lowest cutoff frequency in Hz.
pub const MIN_CUTOFF: f32 = 20.0;

/// Highest cutoff as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.45;

/// Which output of the filter is returned by [`Effect::process`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Passes frequencies below the cutoff.
    #[default]
    Lowpass,
    /// Passes frequencies above the cutoff.
    Highpass,
    /// Passes frequencies near the cutoff.
    Bandpass,
}

/// State Variable Filter (2-pole, 12 dB/oct).
///
/// ## Parameters
///
/// - `cutoff`: Hz, clamped to `[20, 0.45 × sample_rate]` (default 1000)
/// - `resonance`: Q factor, clamped to `[0.5, 20]` (default 0.707)
/// - `filter_type`: Which output to return (default `Lowpass`)
///
/// # Example
///
/// ```rust
/// use ignition_core::{Effect, FilterType, StateVariableFilter};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_cutoff(1000.0);
/// svf.set_resonance(2.0);
/// svf.set_filter_type(FilterType::Lowpass);
///
/// let output = svf.process(0.5);
/// assert!(output.is_finite());
///
/// // Cutoff never exceeds 0.45 × sample rate
/// svf.set_cutoff(1.0e6);
/// assert_eq!(svf.cutoff(), 48000.0 * 0.45);
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    // Integrator state
    ic1eq: f32,
    ic2eq: f32,

    // Coefficients
    g: f32,
    k: f32,

    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    filter_type: FilterType,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(44_100.0)
    }
}

impl StateVariableFilter {
    /// Create a new SVF with the given sample rate.
    ///
    /// Initialises with cutoff = 1000 Hz, Q = 0.707 (Butterworth), lowpass output.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.707,
            filter_type: FilterType::Lowpass,
        };
        svf.cutoff = svf.clamp_cutoff(svf.cutoff);
        svf.update_coefficients();
        svf
    }

    /// Clamp a frequency to the legal cutoff range for the current sample rate.
    #[inline]
    pub fn clamp_cutoff(&self, freq: f32) -> f32 {
        let max = self.max_cutoff();
        // NaN falls through `clamp` unchanged; pin it to the ceiling.
        if freq.is_nan() {
            return max;
        }
        freq.clamp(MIN_CUTOFF, max)
    }

    /// Highest legal cutoff, `0.45 × sample_rate`.
    #[inline]
    pub fn max_cutoff(&self) -> f32 {
        (self.sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF)
    }

    /// Set cutoff frequency in Hz. Values are clamped, never rejected.
    #[inline]
    pub fn set_cutoff(&mut self, freq: f32) {
        let freq = self.clamp_cutoff(freq);
        if freq != self.cutoff {
            self.cutoff = freq;
            self.update_coefficients();
        }
    }

    /// Current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Set resonance (Q factor).
    ///
    /// Range: 0.5 to 20.0. Values are clamped. Q = 0.707 gives a Butterworth
    /// (maximally flat) response. Higher Q produces a resonant peak at cutoff.
    pub fn set_resonance(&mut self, q: f32) {
        self.resonance = if q.is_nan() { 0.707 } else { q.clamp(0.5, 20.0) };
        self.update_coefficients();
    }

    /// Current resonance (Q factor).
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Select which output [`Effect::process`] returns.
    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    /// Current output selection.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    fn update_coefficients(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample and return `(lowpass, highpass, bandpass)`.
    #[inline]
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        // Overflowed or NaN state never decays; restart from rest.
        if !(self.ic1eq.is_finite() && self.ic2eq.is_finite()) {
            self.ic1eq = 0.0;
            self.ic2eq = 0.0;
        }

        let lp = v2;
        let bp = v1;
        let hp = input - self.k * v1 - v2;

        (lp, hp, bp)
    }
}

impl Effect for StateVariableFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let (lp, hp, bp) = self.process_all(input);

        match self.filter_type {
            FilterType::Lowpass => lp,
            FilterType::Highpass => hp,
            FilterType::Bandpass => bp,
        }
    }

    fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Invalid rates are ignored; callers validate at their own boundary.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return;
        }
        self.sample_rate = sample_rate;
        self.cutoff = self.clamp_cutoff(self.cutoff);
        self.update_coefficients();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svf_lowpass_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);

        // DC should pass through lowpass
        let mut output = 0.0;
        for _ in 0..1000 {
            output = svf.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.05, "DC should pass, got {output}");
    }

    #[test]
    fn test_svf_highpass_blocks_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_cutoff(1000.0);
        svf.set_filter_type(FilterType::Highpass);

        let mut output = 0.0;
        for _ in 0..1000 {
            output = svf.process(1.0);
        }
        assert!(output.abs() < 0.1, "DC should be blocked, got {output}");
    }

    #[test]
    fn test_svf_bandpass_blocks_dc() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_filter_type(FilterType::Bandpass);

        let mut output = 0.0;
        for _ in 0..2000 {
            output = svf.process(1.0);
        }
        assert!(output.abs() < 0.05, "got {output}");
    }

    #[test]
    fn test_cutoff_clamped() {
        let mut svf = StateVariableFilter::new(44_100.0);
        svf.set_cutoff(5.0);
        assert_eq!(svf.cutoff(), MIN_CUTOFF);
        svf.set_cutoff(30_000.0);
        assert_eq!(svf.cutoff(), 44_100.0 * MAX_CUTOFF_RATIO);
        svf.set_cutoff(f32::NAN);
        assert_eq!(svf.cutoff(), 44_100.0 * MAX_CUTOFF_RATIO);
    }

    #[test]
    fn test_sample_rate_change_reclamps_cutoff() {
        let mut svf = StateVariableFilter::new(96_000.0);
        svf.set_cutoff(40_000.0);
        svf.set_sample_rate(44_100.0);
        assert!(svf.cutoff() <= 44_100.0 * MAX_CUTOFF_RATIO);

        svf.set_sample_rate(0.0);
        assert!(svf.cutoff() <= 44_100.0 * MAX_CUTOFF_RATIO);
    }

    #[test]
    fn test_resonance_clamped() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance(100.0);
        assert_eq!(svf.resonance(), 20.0);
        svf.set_resonance(0.0);
        assert_eq!(svf.resonance(), 0.5);
    }

    #[test]
    fn test_stable_under_per_sample_sweep() {
        let mut svf = StateVariableFilter::new(44_100.0);
        svf.set_resonance(4.0);
        for i in 0..20_000 {
            let sweep = 20.0 + (i % 500) as f32 * 40.0;
            svf.set_cutoff(sweep);
            let input = libm::sinf(i as f32 * 0.05);
            let out = svf.process(input);
            assert!(out.is_finite() && out.abs() < 50.0, "sample {i}: {out}");
        }
    }

    #[test]
    fn test_recovers_from_extreme_input() {
        let mut svf = StateVariableFilter::new(48000.0);
        svf.set_resonance(4.0);
        for x in [3e38, -3e38, 3e38, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            svf.process(x);
            assert!(svf.ic1eq.is_finite() && svf.ic2eq.is_finite());
        }

        for _ in 0..256 {
            let out = svf.process(0.1);
            assert!(out.is_finite(), "got {out}");
        }
    }

    #[test]
    fn test_svf_reset() {
        let mut svf = StateVariableFilter::new(48000.0);
        for _ in 0..100 {
            svf.process(1.0);
        }

        svf.reset();

        assert_eq!(svf.ic1eq, 0.0);
        assert_eq!(svf.ic2eq, 0.0);
        assert_eq!(svf.process(0.0), 0.0);
    }
}
