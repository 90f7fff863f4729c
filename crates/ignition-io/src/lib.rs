//! Audio file I/O for the ignition distortion engine.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for any channel count
//! - **Planar buffers**: [`AudioBuffer`] with interleave/deinterleave helpers
//! - **Offline rendering**: [`ProcessingEngine`] runs a [`SignalChain`](ignition_effects::SignalChain)
//!   over a whole buffer block by block
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ignition_effects::ChainParams;
//! use ignition_io::{ProcessingEngine, read_wav, write_wav};
//!
//! let (mut buffer, spec) = read_wav("input.wav")?;
//!
//! let mut engine = ProcessingEngine::new(spec.sample_rate as f32, buffer.channel_count(), 512)?;
//! engine.process_buffer(&ChainParams::default(), &mut buffer, |_| {})?;
//!
//! write_wav("output.wav", &buffer, spec)?;
//! ```

mod buffer;
mod engine;
mod wav;

pub use buffer::AudioBuffer;
pub use engine::{DEFAULT_BLOCK_SIZE, ProcessingEngine};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// A buffer must have at least one channel.
    #[error("Audio buffer has no channels")]
    EmptyChannels,

    /// Channels of one buffer must all have the same length.
    #[error("Channel {channel} has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Offending channel.
        channel: usize,
        /// Length of channel 0.
        expected: usize,
        /// Length of the offending channel.
        got: usize,
    },

    /// Signal chain configuration was rejected.
    #[error("Invalid chain configuration: {0}")]
    Config(#[from] ignition_core::ConfigError),

    /// A block did not fit the prepared chain.
    #[error("Block processing failed: {0}")]
    Process(#[from] ignition_effects::ProcessError),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
