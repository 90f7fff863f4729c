//! Lock-free state shared between the control thread and the audio thread.
//!
//! [`AtomicParams`] holds every chain parameter as an `AtomicU32` (f32
//! bit-cast). The control thread writes individual values; the audio thread
//! takes one [`ChainParams`] snapshot per block. Loads and stores are
//! independent per parameter, so a snapshot may mix values from before and
//! after a concurrent write to a different parameter.
//!
//! [`VisualState`] carries the distortion settings and the last modulation
//! value from the audio thread to a visualization thread.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use ignition_core::{ParamDescriptor, ParameterInfo};

use crate::distortion::{Algorithm, DistortionEngine, WaveshapePreview};
use crate::params::{self, ChainParams, PARAM_COUNT, PARAM_DESCRIPTORS};

/// Shared, lock-free parameter store.
///
/// Cloning is cheap and every clone refers to the same values.
///
/// # Example
///
/// ```rust
/// use ignition_effects::AtomicParams;
/// use ignition_effects::params::DRIVE;
///
/// let params = AtomicParams::new();
/// let audio_side = params.clone();
///
/// params.set(DRIVE, 50.0);
/// assert_eq!(audio_side.get(DRIVE), Some(20.0)); // clamped
///
/// assert_eq!(params.set_by_id("mix", 0.5), Some(0.5));
/// assert_eq!(audio_side.snapshot().mix, 0.5);
/// ```
#[derive(Clone)]
pub struct AtomicParams {
    values: Arc<[AtomicU32; PARAM_COUNT]>,
}

impl core::fmt::Debug for AtomicParams {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtomicParams")
            .field("values", &self.values())
            .finish()
    }
}

impl Default for AtomicParams {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicParams {
    /// Store with every parameter at its default.
    pub fn new() -> Self {
        Self {
            values: Arc::new(core::array::from_fn(|i| {
                AtomicU32::new(PARAM_DESCRIPTORS[i].default.to_bits())
            })),
        }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<&'static ParamDescriptor> {
        params::descriptor(index)
    }

    /// All descriptors, in index order.
    pub fn descriptors(&self) -> &'static [ParamDescriptor] {
        &PARAM_DESCRIPTORS
    }

    /// Index of a parameter by string id (case-insensitive).
    pub fn index_of(&self, id: &str) -> Option<usize> {
        params::index_of(id)
    }

    /// Read the current value of a parameter (lock-free).
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Write a parameter value (lock-free). Clamps to descriptor bounds.
    ///
    /// Out-of-range indices are ignored.
    pub fn set(&self, index: usize, value: f32) {
        if let Some((atomic, desc)) = self.values.get(index).zip(PARAM_DESCRIPTORS.get(index)) {
            atomic.store(desc.clamp(value).to_bits(), Ordering::Release);
        }
    }

    /// Write by string id. Returns the stored (clamped) value, or `None` for
    /// an unknown id.
    pub fn set_by_id(&self, id: &str, value: f32) -> Option<f32> {
        let index = self.index_of(id)?;
        self.set(index, value);
        self.get(index)
    }

    /// Current value mapped to `[0, 1]` through the descriptor's scale.
    pub fn get_normalized(&self, index: usize) -> Option<f32> {
        let desc = self.descriptor(index)?;
        self.get(index).map(|v| desc.normalize(v).clamp(0.0, 1.0))
    }

    /// Set from a normalized `[0, 1]` value through the descriptor's scale.
    pub fn set_normalized(&self, index: usize, normalized: f32) {
        if let Some(desc) = self.descriptor(index) {
            let n = if normalized.is_nan() {
                desc.normalize(desc.default)
            } else {
                normalized.clamp(0.0, 1.0)
            };
            self.set(index, desc.denormalize(n));
        }
    }

    /// Raw values of every parameter, in index order.
    pub fn values(&self) -> [f32; PARAM_COUNT] {
        core::array::from_fn(|i| f32::from_bits(self.values[i].load(Ordering::Acquire)))
    }

    /// Typed snapshot for one audio block.
    pub fn snapshot(&self) -> ChainParams {
        ChainParams::from_values(&self.values())
    }

    /// Store every value of `params`.
    pub fn load(&self, params: &ChainParams) {
        for (i, value) in params.to_values().into_iter().enumerate() {
            self.set(i, value);
        }
    }

    /// Return every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for (i, desc) in PARAM_DESCRIPTORS.iter().enumerate() {
            self.values[i].store(desc.default.to_bits(), Ordering::Release);
        }
    }
}

impl ParameterInfo for AtomicParams {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.descriptor(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        self.get(index).unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        self.set(index, value);
    }
}

/// Distortion settings published by the audio thread for visualization.
///
/// Three independent atomics; a reader may see a drive from one block and a
/// modulation from the next.
#[derive(Debug)]
pub struct VisualState {
    drive: AtomicU32,
    algorithm: AtomicU32,
    modulation: AtomicU32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualState {
    /// Drive 1.0, HardClip, no modulation.
    pub fn new() -> Self {
        Self {
            drive: AtomicU32::new(1.0f32.to_bits()),
            algorithm: AtomicU32::new(0),
            modulation: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// Publish the current distortion settings. Wait-free.
    #[inline]
    pub fn publish(&self, drive: f32, algorithm: Algorithm, modulation: f32) {
        self.drive.store(drive.to_bits(), Ordering::Release);
        self.algorithm.store(algorithm.index(), Ordering::Release);
        self.modulation.store(modulation.to_bits(), Ordering::Release);
    }

    /// Last published `(drive, algorithm, modulation)`.
    pub fn load(&self) -> (f32, Algorithm, f32) {
        (
            f32::from_bits(self.drive.load(Ordering::Acquire)),
            Algorithm::from_index(self.algorithm.load(Ordering::Acquire)),
            f32::from_bits(self.modulation.load(Ordering::Acquire)),
        )
    }

    /// Transfer curve for the last published settings.
    ///
    /// Evaluated on a fresh engine owned by the caller.
    pub fn waveshape_preview(&self) -> WaveshapePreview {
        let (drive, algorithm, modulation) = self.load();
        let mut engine = DistortionEngine::new();
        engine.set_drive(drive);
        engine.set_algorithm(algorithm);
        engine.set_modulation(modulation);
        engine.waveshape_preview()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ALGORITHM, DRIVE, MIX, POST_CUTOFF, PRE_ON};

    #[test]
    fn test_defaults() {
        let p = AtomicParams::new();
        for (i, desc) in PARAM_DESCRIPTORS.iter().enumerate() {
            assert_eq!(p.get(i), Some(desc.default));
        }
        assert_eq!(p.get(PARAM_COUNT), None);
        assert_eq!(p.snapshot(), ChainParams::default());
    }

    #[test]
    fn test_set_clamps_and_ignores_bad_index() {
        let p = AtomicParams::new();
        p.set(MIX, 7.0);
        assert_eq!(p.get(MIX), Some(1.0));
        p.set(DRIVE, f32::NAN);
        assert_eq!(p.get(DRIVE), Some(1.0));
        p.set(99, 1.0);
        assert_eq!(p.set_by_id("nope", 1.0), None);
    }

    #[test]
    fn test_normalized_log_cutoff() {
        let p = AtomicParams::new();
        p.set_normalized(POST_CUTOFF, 0.5);
        let hz = p.get(POST_CUTOFF).unwrap();
        assert!((hz - 2_000.0).abs() < 1.0, "got {hz}");
        assert!((p.get_normalized(POST_CUTOFF).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_snapshot_decodes_typed() {
        let p = AtomicParams::new();
        p.set(ALGORITHM, 1.4);
        p.set(PRE_ON, 0.9);
        let s = p.snapshot();
        assert_eq!(s.algorithm, Algorithm::Tube);
        assert!(s.routing.pre_enabled());
    }

    #[test]
    fn test_load_roundtrip() {
        let p = AtomicParams::new();
        let mut params = ChainParams::default();
        params.drive = 3.0;
        params.algorithm = Algorithm::Rectify;
        params.mix = 0.4;
        p.load(&params);
        assert_eq!(p.snapshot(), params);

        p.reset_to_defaults();
        assert_eq!(p.snapshot(), ChainParams::default());
    }

    #[test]
    fn test_parameter_info_lookup() {
        let mut p = AtomicParams::new();
        let idx = p.find_param_by_name("Drive Mod").unwrap();
        p.set_param(idx, 0.7);
        assert_eq!(p.get_param(idx), 0.7);
    }

    #[test]
    fn test_clones_share_values() {
        let a = AtomicParams::new();
        let b = a.clone();
        a.set(MIX, 0.3);
        assert_eq!(b.get(MIX), Some(0.3));
    }

    #[test]
    fn test_visual_state_preview() {
        let visual = VisualState::new();
        visual.publish(10.0, Algorithm::HardClip, 0.0);
        let curve = visual.waveshape_preview();
        assert_eq!(curve[0].1, -1.0);
        assert_eq!(curve[99].1, 1.0);
        assert_eq!(visual.load(), (10.0, Algorithm::HardClip, 0.0));
    }
}
