//! Envelope follower for tracking signal amplitude.
//!
//! Drives every modulation route in the signal chain: cutoff sweep, drive
//! modulation and the gate all read the value returned by
//! [`EnvelopeFollower::process`]. Optionally records a decimated trace of its
//! output into a lock-free [`HistoryRing`](crate::HistoryRing) for display.

use libm::expf;

use crate::error::{ConfigError, positive};
use crate::flush_denormal;
use crate::history::{HistoryReader, HistoryRing, HistoryWriter};

/// One history entry is recorded every this many processed samples.
pub const HISTORY_DECIMATION: u32 = 255;

/// ln(9): the time constant maps to the 10%–90% rise time of a step.
const LN_9: f32 = 2.197_224_6;

/// Smallest smoothing coefficient. `expf` underflows to 0 for very short times.
const MIN_COEFF: f32 = f32::MIN_POSITIVE;

/// Largest smoothing coefficient. `expf` rounds to 1 for very long times,
/// which would freeze the envelope.
const MAX_COEFF: f32 = 1.0 - f32::EPSILON;

/// Peak envelope follower with separate attack and release smoothing.
///
/// Each smoothing coefficient is `exp(-ln(9) / (time_s × sample_rate))`, so a
/// step input reaches 90% of its target after roughly `time_s` seconds.
/// Coefficients are kept strictly inside (0, 1) for every positive setting.
///
/// Not `Clone`: a follower may own the single writer of a history ring.
///
/// # Example
///
/// ```rust
/// use ignition_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::with_config(0.001, 0.1, 48000.0).unwrap();
/// let level = env.process(-0.5);
/// assert!(level > 0.0 && level <= 0.5);
///
/// // Invalid times are rejected and leave the follower unchanged.
/// assert!(env.set_attack(0.0).is_err());
/// assert_eq!(env.attack_time(), 0.001);
/// ```
#[derive(Debug)]
pub struct EnvelopeFollower {
    attack_s: f32,
    release_s: f32,
    sample_rate: f32,
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
    /// Samples since the last history entry.
    counter: u32,
    history: Option<HistoryWriter>,
}

impl EnvelopeFollower {
    /// Default attack time in seconds.
    pub const DEFAULT_ATTACK: f32 = 0.01;
    /// Default release time in seconds.
    pub const DEFAULT_RELEASE: f32 = 0.5;
    /// Default sample rate in Hz.
    pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

    /// Create a follower with 10 ms attack, 500 ms release at 44.1 kHz.
    pub fn new() -> Self {
        let mut follower = Self {
            attack_s: Self::DEFAULT_ATTACK,
            release_s: Self::DEFAULT_RELEASE,
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            envelope: 0.0,
            counter: 0,
            history: None,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Create a follower with the given timing.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn with_config(
        attack_s: f32,
        release_s: f32,
        sample_rate: f32,
    ) -> Result<Self, ConfigError> {
        let mut follower = Self::new();
        follower.configure(attack_s, release_s, sample_rate)?;
        Ok(follower)
    }

    /// Set attack, release (seconds) and sample rate (Hz) together.
    ///
    /// All three values are validated before anything changes. The envelope
    /// value itself is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any value is zero, negative or not finite.
    pub fn configure(
        &mut self,
        attack_s: f32,
        release_s: f32,
        sample_rate: f32,
    ) -> Result<(), ConfigError> {
        let attack_s = positive(attack_s, ConfigError::InvalidAttack)?;
        let release_s = positive(release_s, ConfigError::InvalidRelease)?;
        let sample_rate = positive(sample_rate, ConfigError::InvalidSampleRate)?;

        self.attack_s = attack_s;
        self.release_s = release_s;
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attack_s,
            release_s,
            sample_rate,
            attack_coeff = self.attack_coeff,
            release_coeff = self.release_coeff,
            "envelope follower configured"
        );
        Ok(())
    }

    /// Set the attack time in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAttack`] for non-positive or non-finite input.
    pub fn set_attack(&mut self, attack_s: f32) -> Result<(), ConfigError> {
        self.configure(attack_s, self.release_s, self.sample_rate)
    }

    /// Set the release time in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRelease`] for non-positive or non-finite input.
    pub fn set_release(&mut self, release_s: f32) -> Result<(), ConfigError> {
        self.configure(self.attack_s, release_s, self.sample_rate)
    }

    /// Update the sample rate and recalculate coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSampleRate`] for non-positive or non-finite input.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), ConfigError> {
        self.configure(self.attack_s, self.release_s, sample_rate)
    }

    /// Attack time in seconds.
    pub fn attack_time(&self) -> f32 {
        self.attack_s
    }

    /// Release time in seconds.
    pub fn release_time(&self) -> f32 {
        self.release_s
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Attack smoothing coefficient, always in (0, 1).
    pub fn attack_coeff(&self) -> f32 {
        self.attack_coeff
    }

    /// Release smoothing coefficient, always in (0, 1).
    pub fn release_coeff(&self) -> f32 {
        self.release_coeff
    }

    /// Process a sample and return the updated envelope level.
    ///
    /// The result is a convex combination of the previous envelope and
    /// `|input|`. Every [`HISTORY_DECIMATION`] samples the current value is
    /// appended to the history ring, if one is attached.
    ///
    /// NaN input counts as silence and infinite input as `f32::MAX`, so the
    /// envelope itself is always finite.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = if input.is_nan() {
            0.0
        } else {
            input.abs().min(f32::MAX)
        };

        // Rising signal uses attack, falling or steady uses release
        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        self.envelope =
            flush_denormal(coeff * self.envelope + (1.0 - coeff) * input_abs).min(f32::MAX);

        self.counter += 1;
        if self.counter >= HISTORY_DECIMATION {
            self.counter = 0;
            if let Some(history) = self.history.as_mut() {
                history.push(self.envelope);
            }
        }

        self.envelope
    }

    /// Current envelope level without processing new input.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Zero the envelope and the decimation counter.
    ///
    /// Recorded history is kept.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
        self.counter = 0;
    }

    /// Reader for this follower's decimated history.
    ///
    /// The ring is allocated on first call; later calls return readers of
    /// the same ring.
    pub fn history_reader(&mut self) -> HistoryReader {
        match &self.history {
            Some(writer) => writer.reader(),
            None => {
                let (writer, reader) = HistoryRing::split();
                self.history = Some(writer);
                reader
            }
        }
    }

    /// Whether a history ring is attached.
    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = coefficient(self.attack_s, self.sample_rate);
        self.release_coeff = coefficient(self.release_s, self.sample_rate);
    }
}

#[inline]
fn coefficient(time_s: f32, sample_rate: f32) -> f32 {
    expf(-LN_9 / (time_s * sample_rate)).clamp(MIN_COEFF, MAX_COEFF)
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HISTORY_CAPACITY;

    #[test]
    fn test_defaults() {
        let env = EnvelopeFollower::default();
        assert_eq!(env.attack_time(), 0.01);
        assert_eq!(env.release_time(), 0.5);
        assert_eq!(env.sample_rate(), 44_100.0);
        assert_eq!(env.envelope(), 0.0);
        assert!(!env.has_history());
    }

    #[test]
    fn test_coefficient_formula() {
        let env = EnvelopeFollower::with_config(0.01, 0.5, 48_000.0).unwrap();
        let expected = expf(-LN_9 / (0.01 * 48_000.0));
        assert!((env.attack_coeff() - expected).abs() < 1e-7);
        assert!(env.attack_coeff() > 0.0 && env.attack_coeff() < 1.0);
        assert!(env.release_coeff() > env.attack_coeff());
    }

    #[test]
    fn test_extreme_times_keep_coefficients_inside_unit_interval() {
        let fast = EnvelopeFollower::with_config(1e-7, 0.5, 48_000.0).unwrap();
        assert!(fast.attack_coeff() > 0.0 && fast.attack_coeff() < 1.0);

        let slow = EnvelopeFollower::with_config(0.01, 1e6, 192_000.0).unwrap();
        assert!(slow.release_coeff() > 0.0 && slow.release_coeff() < 1.0);

        let tiny = EnvelopeFollower::with_config(f32::MIN_POSITIVE, 1e30, 1e-3).unwrap();
        assert!(tiny.attack_coeff() > 0.0 && tiny.attack_coeff() < 1.0);
        assert!(tiny.release_coeff() > 0.0 && tiny.release_coeff() < 1.0);
    }

    #[test]
    fn test_very_long_release_still_decays() {
        let mut env = EnvelopeFollower::with_config(0.01, 1e6, 192_000.0).unwrap();
        for _ in 0..10_000 {
            env.process(0.7);
        }
        let held = env.envelope();
        for _ in 0..1_000 {
            env.process(0.0);
        }
        assert!(env.envelope() < held, "{} should fall below {held}", env.envelope());
    }

    #[test]
    fn test_non_finite_input_keeps_envelope_finite() {
        let mut env = EnvelopeFollower::with_config(0.001, 0.01, 48_000.0).unwrap();
        for x in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 3e38, f32::NAN] {
            assert!(env.process(x).is_finite());
        }
        for _ in 0..200_000 {
            env.process(0.0);
        }
        assert_eq!(env.envelope(), 0.0);
    }

    #[test]
    fn test_envelope_attack() {
        let mut env = EnvelopeFollower::with_config(0.001, 0.5, 48_000.0).unwrap();

        // Feed constant signal
        let mut envelope = 0.0;
        for _ in 0..500 {
            envelope = env.process(1.0);
        }

        assert!(envelope > 0.9, "Envelope should rise, got {envelope}");
        assert!(envelope <= 1.0);
    }

    #[test]
    fn test_step_response_matches_closed_form() {
        let mut env = EnvelopeFollower::with_config(0.005, 0.5, 48_000.0).unwrap();
        let a = env.attack_coeff();
        let amplitude = 0.8;

        for n in 1..=200 {
            let got = env.process(amplitude);
            let expected = amplitude * (1.0 - libm::powf(a, n as f32));
            assert!(
                (got - expected).abs() < 1e-4,
                "sample {n}: {got} vs {expected}"
            );
        }
    }

    #[test]
    fn test_envelope_release_to_zero() {
        let mut env = EnvelopeFollower::with_config(0.001, 0.01, 48_000.0).unwrap();
        for _ in 0..500 {
            env.process(1.0);
        }

        let mut envelope = 1.0;
        for _ in 0..200_000 {
            envelope = env.process(0.0);
        }

        assert_eq!(envelope, 0.0, "denormal flush should reach exact zero");
    }

    #[test]
    fn test_negative_input_rectified() {
        let mut env = EnvelopeFollower::new();
        let level = env.process(-0.5);
        assert!(level > 0.0);
    }

    #[test]
    fn test_rejected_config_leaves_state() {
        let mut env = EnvelopeFollower::with_config(0.02, 0.2, 48_000.0).unwrap();
        for _ in 0..10 {
            env.process(0.7);
        }
        let before = (env.attack_coeff(), env.release_coeff(), env.envelope());

        assert_eq!(
            env.configure(0.01, -1.0, 48_000.0),
            Err(ConfigError::InvalidRelease(-1.0))
        );
        assert!(matches!(
            env.set_sample_rate(f32::NAN),
            Err(ConfigError::InvalidSampleRate(_))
        ));
        assert_eq!(
            env.set_attack(f32::INFINITY),
            Err(ConfigError::InvalidAttack(f32::INFINITY))
        );

        assert_eq!(
            (env.attack_coeff(), env.release_coeff(), env.envelope()),
            before
        );
        assert_eq!(env.attack_time(), 0.02);
    }

    #[test]
    fn test_reset() {
        let mut env = EnvelopeFollower::new();
        for _ in 0..100 {
            env.process(1.0);
        }

        env.reset();
        assert_eq!(env.envelope(), 0.0);
    }

    #[test]
    fn test_history_decimation() {
        let mut env = EnvelopeFollower::new();
        let reader = env.history_reader();

        for _ in 0..(HISTORY_DECIMATION - 1) {
            env.process(0.5);
        }
        assert!(reader.is_empty());

        let at_push = env.process(0.5);
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.latest(), Some(at_push));
    }

    #[test]
    fn test_history_bounded() {
        let mut env = EnvelopeFollower::new();
        let reader = env.history_reader();

        let samples = HISTORY_DECIMATION as usize * (HISTORY_CAPACITY + 100);
        for i in 0..samples {
            env.process(if i % 1000 < 500 { 0.9 } else { 0.1 });
        }

        assert_eq!(reader.len(), HISTORY_CAPACITY);
        assert_eq!(reader.total_written(), HISTORY_CAPACITY + 100);
    }

    #[test]
    fn test_history_reader_reuses_ring() {
        let mut env = EnvelopeFollower::new();
        let first = env.history_reader();
        let second = env.history_reader();
        for _ in 0..HISTORY_DECIMATION {
            env.process(1.0);
        }
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_reset_restarts_decimation() {
        let mut env = EnvelopeFollower::new();
        let reader = env.history_reader();
        for _ in 0..200 {
            env.process(1.0);
        }
        env.reset();
        for _ in 0..200 {
            env.process(1.0);
        }
        assert!(reader.is_empty());
    }
}
