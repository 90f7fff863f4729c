//! Multi-algorithm distortion engine with envelope-modulated drive.
//!
//! Five waveshaping algorithms share one drive control. The effective drive
//! for each sample is `drive × (1 + modulation)`, where the modulation amount
//! is supplied per sample by the signal chain (pre-effect envelope × drive
//! modulation depth).
//!
//! | Algorithm | Transfer | Character |
//! |-----------|----------|-----------|
//! | HardClip | `clamp(x·d, ±1)` | Harsh, flat tops |
//! | Tube | asymmetric `tanh` | Warm, even harmonics |
//! | Fuzz | `sign(v)·(1 − e^(−k|v|))` | Buzzy, early saturation |
//! | Rectify | `tanh(|x·d|)` | Octave-up, DC shifted |
//! | Downsample | sample-and-hold | Aliased, lo-fi |

use ignition_core::{Effect, asymmetric_clip, fuzz_clip, hard_clip, rectify};
use libm::roundf;

/// Number of points in a waveshape preview.
pub const PREVIEW_POINTS: usize = 100;

/// Transfer curve samples: `(input, output)` pairs over `[-1, 1]`.
pub type WaveshapePreview = [(f32, f32); PREVIEW_POINTS];

/// Longest sample-and-hold period of the Downsample algorithm, in samples.
pub const MAX_HOLD: u32 = 64;

/// Upper bound on the per-sample modulation amount.
const MAX_MODULATION: f32 = 100.0;

/// Waveshaping algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Algorithm {
    /// Hard clipping at ±1.
    #[default]
    HardClip,
    /// Asymmetric soft saturation.
    Tube,
    /// Steep exponential saturation.
    Fuzz,
    /// Full-wave rectification into soft saturation.
    Rectify,
    /// Sample-and-hold rate reduction; hold length follows effective drive.
    Downsample,
}

impl Algorithm {
    /// Every algorithm, in selector order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::HardClip,
        Algorithm::Tube,
        Algorithm::Fuzz,
        Algorithm::Rectify,
        Algorithm::Downsample,
    ];

    /// Map a selector index to an algorithm.
    ///
    /// Out-of-range indices fall back to [`Algorithm::HardClip`].
    ///
    /// ```rust
    /// use ignition_effects::Algorithm;
    ///
    /// assert_eq!(Algorithm::from_index(1), Algorithm::Tube);
    /// assert_eq!(Algorithm::from_index(99), Algorithm::HardClip);
    /// ```
    pub fn from_index(index: u32) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Algorithm::HardClip)
    }

    /// Selector index of this algorithm.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Lowercase name used in presets and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::HardClip => "hardclip",
            Algorithm::Tube => "tube",
            Algorithm::Fuzz => "fuzz",
            Algorithm::Rectify => "rectify",
            Algorithm::Downsample => "downsample",
        }
    }

    /// Parse a name (case-insensitive, `-`/`_` ignored).
    pub fn from_name(name: &str) -> Option<Self> {
        let mut buf = [0u8; 16];
        let mut len = 0;
        for b in name.bytes().filter(|b| *b != b'-' && *b != b'_') {
            if len == buf.len() {
                return None;
            }
            buf[len] = b.to_ascii_lowercase();
            len += 1;
        }
        let key = &buf[..len];
        Self::ALL
            .into_iter()
            .find(|alg| alg.name().as_bytes() == key)
    }
}

impl core::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Distortion engine for a single channel.
///
/// Configuration setters are cheap and may be called every block; the
/// modulation setter is called every sample. The only per-sample state is the
/// Downsample hold counter and held value, which survive algorithm and drive
/// changes and are cleared only by [`Effect::reset`].
///
/// # Example
///
/// ```rust
/// use ignition_core::Effect;
/// use ignition_effects::{Algorithm, DistortionEngine};
///
/// let mut dist = DistortionEngine::new();
/// dist.set_drive(4.0);
/// dist.set_algorithm(Algorithm::HardClip);
///
/// assert_eq!(dist.process(0.1), 0.4);
/// assert_eq!(dist.process(0.5), 1.0);
///
/// // Preview runs on a copy and leaves `dist` untouched
/// let curve = dist.waveshape_preview();
/// assert_eq!(curve.len(), 100);
/// assert_eq!(curve[0], (-1.0, -1.0));
/// ```
#[derive(Debug, Clone)]
pub struct DistortionEngine {
    drive: f32,
    algorithm: Algorithm,
    modulation: f32,
    hold_counter: u32,
    held: f32,
}

impl Default for DistortionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DistortionEngine {
    /// Minimum drive.
    pub const MIN_DRIVE: f32 = 0.01;
    /// Maximum drive.
    pub const MAX_DRIVE: f32 = 20.0;

    /// Create an engine with drive 1.0, HardClip, no modulation.
    pub fn new() -> Self {
        Self {
            drive: 1.0,
            algorithm: Algorithm::HardClip,
            modulation: 0.0,
            hold_counter: 0,
            held: 0.0,
        }
    }

    /// Set base drive, clamped to `[0.01, 20]`. NaN is ignored.
    pub fn set_drive(&mut self, drive: f32) {
        if !drive.is_nan() {
            self.drive = drive.clamp(Self::MIN_DRIVE, Self::MAX_DRIVE);
        }
    }

    /// Base drive.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Select the waveshaping algorithm.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    /// Selected algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Set the per-sample modulation amount.
    ///
    /// Negative and NaN values count as no modulation; very large values are
    /// capped so the effective drive stays finite.
    #[inline]
    pub fn set_modulation(&mut self, amount: f32) {
        self.modulation = amount.max(0.0).min(MAX_MODULATION);
    }

    /// Current modulation amount.
    pub fn modulation(&self) -> f32 {
        self.modulation
    }

    /// `drive × (1 + modulation)`.
    #[inline]
    pub fn effective_drive(&self) -> f32 {
        self.drive * (1.0 + self.modulation)
    }

    /// Sample-and-hold period for the current effective drive.
    #[inline]
    pub fn hold_length(&self) -> u32 {
        (roundf(self.effective_drive()) as u32).clamp(1, MAX_HOLD)
    }

    /// Evaluate the transfer curve at [`PREVIEW_POINTS`] evenly spaced inputs
    /// in `[-1, 1]`.
    ///
    /// Runs on a freshly reset copy of this engine, so the live Downsample
    /// state is never touched and the curve does not depend on it.
    pub fn waveshape_preview(&self) -> WaveshapePreview {
        let mut probe = self.clone();
        probe.reset();
        core::array::from_fn(|i| {
            let x = -1.0 + 2.0 * i as f32 / (PREVIEW_POINTS - 1) as f32;
            (x, probe.process(x))
        })
    }

    #[inline]
    fn sample_and_hold(&mut self, x: f32) -> f32 {
        if self.hold_counter == 0 {
            self.held = hard_clip(x, 1.0);
        }
        self.hold_counter += 1;
        if self.hold_counter >= self.hold_length() {
            self.hold_counter = 0;
        }
        self.held
    }
}

impl Effect for DistortionEngine {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let driven = input * self.effective_drive();
        match self.algorithm {
            Algorithm::HardClip => hard_clip(driven, 1.0),
            Algorithm::Tube => asymmetric_clip(driven),
            Algorithm::Fuzz => fuzz_clip(driven),
            Algorithm::Rectify => rectify(driven),
            Algorithm::Downsample => self.sample_and_hold(input),
        }
    }

    /// No sample-rate dependent state.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        self.hold_counter = 0;
        self.held = 0.0;
    }
}
