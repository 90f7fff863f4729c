//! Read-only visualization handle.

use alloc::sync::Arc;
use alloc::vec::Vec;

use ignition_core::HistoryReader;

use crate::distortion::{Algorithm, WaveshapePreview};
use crate::shared::VisualState;

/// Pulls envelope traces and the transfer curve from any thread.
///
/// Obtained from [`SignalChain::visualizer`](crate::SignalChain::visualizer).
/// Every method is lock-free and never touches live DSP state: histories are
/// copied out of their rings and the waveshape is recomputed from the last
/// published drive, algorithm and modulation.
///
/// # Example
///
/// ```rust
/// use ignition_effects::{ChainParams, SignalChain};
///
/// let mut chain = SignalChain::new(48000.0, 1).unwrap();
/// let vis = chain.visualizer();
///
/// let handle = std::thread::spawn(move || vis.envelope_history().len());
///
/// let mut block = [0.5f32; 1024];
/// chain.process_block(&ChainParams::default(), &mut [&mut block]).unwrap();
///
/// assert!(handle.join().unwrap() <= 4);
/// ```
#[derive(Debug, Clone)]
pub struct Visualizer {
    input_history: HistoryReader,
    output_history: HistoryReader,
    visual: Arc<VisualState>,
}

impl Visualizer {
    pub(crate) fn new(
        input_history: HistoryReader,
        output_history: HistoryReader,
        visual: Arc<VisualState>,
    ) -> Self {
        Self {
            input_history,
            output_history,
            visual,
        }
    }

    /// Decimated pre-effect envelope, oldest first.
    pub fn envelope_history(&self) -> Vec<f32> {
        self.input_history.to_vec()
    }

    /// Decimated output envelope, oldest first.
    pub fn post_envelope_history(&self) -> Vec<f32> {
        self.output_history.to_vec()
    }

    /// Copy the pre-effect envelope into `out` without allocating.
    ///
    /// Returns the number of values written.
    pub fn copy_envelope_history(&self, out: &mut [f32]) -> usize {
        self.input_history.copy_into(out)
    }

    /// Copy the output envelope into `out` without allocating.
    pub fn copy_post_envelope_history(&self, out: &mut [f32]) -> usize {
        self.output_history.copy_into(out)
    }

    /// Most recent pre-effect envelope entry.
    pub fn latest_envelope(&self) -> Option<f32> {
        self.input_history.latest()
    }

    /// Transfer curve for the last published distortion settings.
    pub fn waveshape_preview(&self) -> WaveshapePreview {
        self.visual.waveshape_preview()
    }

    /// Last published `(drive, algorithm, modulation)`.
    pub fn distortion_state(&self) -> (f32, Algorithm, f32) {
        self.visual.load()
    }
}
