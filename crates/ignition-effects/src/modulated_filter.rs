//! Resonant filter with per-sample envelope-modulated cutoff.
//!
//! Configuration (base cutoff, resonance, modulation depth, response type) is
//! shared across channels; every channel owns its own
//! [`StateVariableFilter`] so integrator state never leaks between channels.

use alloc::vec::Vec;

use ignition_core::{
    ConfigError, Effect, FilterType, MAX_CUTOFF_RATIO, MIN_CUTOFF, StateVariableFilter, lerp,
};

/// Cutoff sweep, in Hz, at full envelope and full modulation depth.
pub const MAX_SWEEP_HZ: f32 = 20_000.0;

/// Q at normalized resonance 0.0.
pub const MIN_Q: f32 = 0.707;

/// Q at normalized resonance 1.0.
pub const MAX_Q: f32 = 4.0;

/// Multi-channel resonant filter whose cutoff follows a modulation source.
///
/// The modulated cutoff is
/// `clamp(base + 20000 × envelope × depth, 20, 0.45 × sample_rate)`
/// and is recomputed every sample before the integrators advance.
///
/// # Example
///
/// ```rust
/// use ignition_effects::ModulatedFilter;
///
/// let mut filter = ModulatedFilter::new();
/// filter.prepare(48000.0, 2).unwrap();
/// filter.set_cutoff(800.0);
/// filter.set_cutoff_mod(0.5);
///
/// // Envelope 1.0 opens the filter by 10 kHz
/// assert_eq!(filter.modulated_cutoff(1.0), 10_800.0);
/// // ...but never past 0.45 × sample rate
/// filter.set_cutoff_mod(1.0);
/// assert_eq!(filter.modulated_cutoff(2.0), 48000.0 * 0.45);
///
/// let y = filter.process_modulated(0, 0.5, 0.2);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ModulatedFilter {
    sample_rate: f32,
    base_cutoff: f32,
    resonance: f32,
    cutoff_mod: f32,
    filter_type: FilterType,
    channels: Vec<StateVariableFilter>,
}

impl Default for ModulatedFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulatedFilter {
    /// Lowpass at 20 kHz base cutoff, resonance 0, no modulation, 44.1 kHz,
    /// one channel.
    pub fn new() -> Self {
        let mut filter = Self {
            sample_rate: 44_100.0,
            base_cutoff: 20_000.0,
            resonance: 0.0,
            cutoff_mod: 0.0,
            filter_type: FilterType::Lowpass,
            channels: Vec::new(),
        };
        filter.channels.push(filter.new_channel());
        filter
    }

    /// (Re)allocate per-channel state for `channels` channels at `sample_rate`.
    ///
    /// All integrator state is reset. Allocates; call between blocks only.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite sample rates and zero channels,
    /// leaving the filter unchanged.
    pub fn prepare(&mut self, sample_rate: f32, channels: usize) -> Result<(), ConfigError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(ConfigError::InvalidChannelCount(channels));
        }

        self.sample_rate = sample_rate;
        self.base_cutoff = self.clamp_cutoff(self.base_cutoff);
        self.channels.clear();
        self.channels.reserve(channels);
        for _ in 0..channels {
            let svf = self.new_channel();
            self.channels.push(svf);
        }
        Ok(())
    }

    /// Number of prepared channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Set the base (unmodulated) cutoff in Hz.
    ///
    /// Clamped to `[20, 0.45 × sample_rate]`, never rejected.
    pub fn set_cutoff(&mut self, hz: f32) {
        self.base_cutoff = self.clamp_cutoff(hz);
        for svf in &mut self.channels {
            svf.set_cutoff(self.base_cutoff);
        }
    }

    /// Base cutoff in Hz, after clamping.
    pub fn cutoff(&self) -> f32 {
        self.base_cutoff
    }

    /// Set resonance from a normalized control.
    ///
    /// The control is clamped to `[0, 1]` and mapped linearly onto
    /// Q `[0.707, 4.0]`.
    pub fn set_resonance(&mut self, normalized: f32) {
        self.resonance = if normalized.is_nan() {
            0.0
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let q = self.q();
        for svf in &mut self.channels {
            svf.set_resonance(q);
        }
    }

    /// Normalized resonance in `[0, 1]`.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Filter Q derived from the normalized resonance.
    pub fn q(&self) -> f32 {
        lerp(MIN_Q, MAX_Q, self.resonance)
    }

    /// Set cutoff modulation depth in `[0, 1]`.
    pub fn set_cutoff_mod(&mut self, depth: f32) {
        self.cutoff_mod = if depth.is_nan() { 0.0 } else { depth.clamp(0.0, 1.0) };
    }

    /// Cutoff modulation depth.
    pub fn cutoff_mod(&self) -> f32 {
        self.cutoff_mod
    }

    /// Select the filter response. Lowpass by default.
    pub fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
        for svf in &mut self.channels {
            svf.set_filter_type(filter_type);
        }
    }

    /// Selected filter response.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Cutoff for a given envelope value, clamped to the legal range.
    #[inline]
    pub fn modulated_cutoff(&self, envelope: f32) -> f32 {
        self.clamp_cutoff(self.base_cutoff + MAX_SWEEP_HZ * envelope * self.cutoff_mod)
    }

    /// Filter one sample on `channel` at the base cutoff.
    ///
    /// An out-of-range channel returns `x` unchanged.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, x: f32) -> f32 {
        let cutoff = self.base_cutoff;
        match self.channels.get_mut(channel) {
            Some(svf) => {
                svf.set_cutoff(cutoff);
                svf.process(x)
            }
            None => x,
        }
    }

    /// Filter one sample on `channel` with the cutoff modulated by `envelope`.
    ///
    /// An out-of-range channel returns `x` unchanged.
    #[inline]
    pub fn process_modulated(&mut self, channel: usize, x: f32, envelope: f32) -> f32 {
        let cutoff = self.modulated_cutoff(envelope);
        match self.channels.get_mut(channel) {
            Some(svf) => {
                svf.set_cutoff(cutoff);
                svf.process(x)
            }
            None => x,
        }
    }

    /// Zero the integrator state of every channel.
    pub fn reset(&mut self) {
        for svf in &mut self.channels {
            svf.reset();
        }
    }

    fn clamp_cutoff(&self, hz: f32) -> f32 {
        let max = (self.sample_rate * MAX_CUTOFF_RATIO).max(MIN_CUTOFF);
        if hz.is_nan() {
            return max;
        }
        hz.clamp(MIN_CUTOFF, max)
    }

    fn new_channel(&self) -> StateVariableFilter {
        let mut svf = StateVariableFilter::new(self.sample_rate);
        svf.set_filter_type(self.filter_type);
        svf.set_resonance(self.q());
        svf.set_cutoff(self.clamp_cutoff(self.base_cutoff));
        svf
    }
}
