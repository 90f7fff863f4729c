//! Core Effect trait.
//!
//! The [`Effect`] trait is the common interface of every single-channel
//! sample processor in the signal chain: the distortion engine and each
//! per-channel filter instance implement it.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: Single `f32` input/output. Multi-channel processing
//!   is built by owning one instance per channel, so per-sample state is
//!   never shared between channels.
//!
//! - **Object-safe**: `dyn Effect` works, but the signal chain uses static
//!   dispatch.
//!
//! - **No allocations**: All methods are callable from a real-time audio
//!   callback.

/// Core trait for single-channel audio processors.
///
/// # Example
///
/// ```rust
/// use ignition_core::Effect;
///
/// struct Polarity;
///
/// impl Effect for Polarity {
///     fn process(&mut self, input: f32) -> f32 {
///         -input
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut flip = Polarity;
/// let mut block = [0.25, -0.5];
/// flip.process_block_inplace(&mut block);
/// assert_eq!(block, [-0.25, 0.5]);
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls `process()` for each sample.
    ///
    /// # Panics
    /// Debug builds panic if `input.len() != output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate.
    ///
    /// Called between blocks only. Implementations recalculate any
    /// sample-rate-dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state without changing parameters.
    fn reset(&mut self);
}
