//! Envelope-keyed gate on the wet signal.
//!
//! Mutes the processed signal while the pre-effect envelope sits below a
//! threshold, so distortion of low-level noise never reaches the mix. The dry
//! path is not gated. A short linear ramp avoids clicks when the gate moves.

/// Gate open/close ramp time in milliseconds.
pub const GATE_RAMP_MS: f32 = 1.0;

/// Threshold gate driven by an external envelope.
///
/// A threshold of `0.0` disables the gate entirely: the input passes through
/// bit-for-bit.
///
/// # Example
///
/// ```rust
/// use ignition_effects::EnvelopeGate;
///
/// let mut gate = EnvelopeGate::new(48000.0);
/// gate.set_threshold(0.2);
///
/// // Envelope far below threshold: after the ramp the wet signal is muted
/// let mut out = 1.0;
/// for _ in 0..100 {
///     out = gate.process(0.5, 0.01);
/// }
/// assert_eq!(out, 0.0);
///
/// // Envelope above threshold reopens it
/// for _ in 0..100 {
///     out = gate.process(0.5, 0.3);
/// }
/// assert_eq!(out, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeGate {
    threshold: f32,
    /// Current gain, 0 = closed, 1 = open
    gain: f32,
    /// Gain change per sample while ramping
    step: f32,
}

impl EnvelopeGate {
    /// Create an open gate with threshold 0 (disabled).
    pub fn new(sample_rate: f32) -> Self {
        let mut gate = Self {
            threshold: 0.0,
            gain: 1.0,
            step: 1.0,
        };
        gate.set_sample_rate(sample_rate);
        gate
    }

    /// Recompute the ramp step. Invalid rates are ignored.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.step = (1000.0 / (GATE_RAMP_MS * sample_rate)).min(1.0);
        }
    }

    /// Set the threshold in linear envelope units, clamped to `[0, 1]`.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
    }

    /// Current threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether the gate is currently fully closed.
    pub fn is_closed(&self) -> bool {
        self.gain == 0.0
    }

    /// Apply the gate to one wet sample given the current envelope.
    #[inline]
    pub fn process(&mut self, wet: f32, envelope: f32) -> f32 {
        if self.threshold <= 0.0 {
            self.gain = 1.0;
            return wet;
        }

        if envelope < self.threshold {
            self.gain = (self.gain - self.step).max(0.0);
        } else {
            self.gain = (self.gain + self.step).min(1.0);
        }
        wet * self.gain
    }

    /// Reopen the gate.
    pub fn reset(&mut self) {
        self.gain = 1.0;
    }
}

impl Default for EnvelopeGate {
    fn default() -> Self {
        Self::new(44_100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_transparent() {
        let mut gate = EnvelopeGate::new(48_000.0);
        for i in 0..64 {
            let x = i as f32 * 0.013 - 0.4;
            assert_eq!(gate.process(x, 0.0), x);
        }
    }

    #[test]
    fn test_closes_within_ramp() {
        let mut gate = EnvelopeGate::new(48_000.0);
        gate.set_threshold(0.1);
        let ramp_samples = (GATE_RAMP_MS * 48.0) as usize + 1;
        for _ in 0..ramp_samples {
            gate.process(0.8, 0.05);
        }
        assert!(gate.is_closed());
        assert_eq!(gate.process(0.8, 0.05), 0.0);
    }

    #[test]
    fn test_ramp_is_monotonic() {
        let mut gate = EnvelopeGate::new(48_000.0);
        gate.set_threshold(0.5);
        let mut prev = 1.0;
        for _ in 0..60 {
            let y = gate.process(1.0, 0.0);
            assert!(y <= prev);
            prev = y;
        }
    }

    #[test]
    fn test_threshold_clamped() {
        let mut gate = EnvelopeGate::default();
        gate.set_threshold(3.0);
        assert_eq!(gate.threshold(), 1.0);
        gate.set_threshold(f32::NAN);
        assert_eq!(gate.threshold(), 0.0);
    }

    #[test]
    fn test_reset_reopens() {
        let mut gate = EnvelopeGate::new(48_000.0);
        gate.set_threshold(0.5);
        for _ in 0..200 {
            gate.process(1.0, 0.0);
        }
        gate.reset();
        assert!(!gate.is_closed());
    }
}
