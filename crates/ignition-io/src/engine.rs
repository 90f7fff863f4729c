//! Offline block-by-block rendering through the signal chain.

use ignition_effects::{ChainParams, SignalChain, Visualizer};

use crate::{AudioBuffer, Result};

/// Default block size for offline rendering.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Runs a [`SignalChain`] over whole buffers in fixed-size blocks, the way a
/// real-time host would.
pub struct ProcessingEngine {
    chain: SignalChain,
    block_size: usize,
}

impl ProcessingEngine {
    /// Create an engine for `channels` channels at `sample_rate`.
    ///
    /// A block size of zero falls back to [`DEFAULT_BLOCK_SIZE`].
    pub fn new(sample_rate: f32, channels: usize, block_size: usize) -> Result<Self> {
        let chain = SignalChain::new(sample_rate, channels)?;
        let block_size = if block_size == 0 {
            DEFAULT_BLOCK_SIZE
        } else {
            block_size
        };
        tracing::debug!(sample_rate, channels, block_size, "processing engine created");
        Ok(Self { chain, block_size })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.chain.sample_rate()
    }

    /// Block size in frames.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The wrapped chain.
    pub fn chain(&self) -> &SignalChain {
        &self.chain
    }

    /// Visualization handle for the wrapped chain.
    pub fn visualizer(&self) -> Visualizer {
        self.chain.visualizer()
    }

    /// Reset all DSP state.
    pub fn reset(&mut self) {
        self.chain.reset();
    }

    /// Process `buffer` in place.
    ///
    /// `on_block` is called after every block with the number of frames
    /// processed so far.
    pub fn process_buffer(
        &mut self,
        params: &ChainParams,
        buffer: &mut AudioBuffer,
        mut on_block: impl FnMut(usize),
    ) -> Result<()> {
        let frames = buffer.frames();
        let mut planes = buffer.channels_mut();
        let mut start = 0;
        while start < frames {
            let end = (start + self.block_size).min(frames);
            let mut block: Vec<&mut [f32]> = planes
                .iter_mut()
                .map(|plane| &mut plane[start..end])
                .collect();
            self.chain.process_block(params, &mut block)?;
            start = end;
            on_block(start);
        }
        tracing::debug!(frames, channels = planes.len(), "buffer processed");
        Ok(())
    }
}
