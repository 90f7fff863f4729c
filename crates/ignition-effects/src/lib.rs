//! Ignition Effects - Envelope-driven distortion signal chain
//!
//! Builds the complete effect on top of ignition-core:
//!
//! - [`DistortionEngine`] - Five-algorithm waveshaper with envelope-modulated drive
//! - [`ModulatedFilter`] - Multi-channel resonant filter with envelope-swept cutoff
//! - [`EnvelopeGate`] - Mutes the wet signal below an envelope threshold
//! - [`SignalChain`] - Per-sample pipeline tying everything together
//!
//! Parameters live in [`params`]: a fixed descriptor table, the typed
//! [`ChainParams`] snapshot read once per block, and [`AtomicParams`], the
//! lock-free store shared with a control thread. [`Visualizer`] pulls envelope
//! histories and the transfer curve from any thread.
//!
//! ## Example
//!
//! ```rust
//! use ignition_effects::{Algorithm, AtomicParams, SignalChain};
//! use ignition_effects::params::{ALGORITHM, DRIVE, DRIVE_MOD};
//!
//! let params = AtomicParams::new();
//! params.set(DRIVE, 8.0);
//! params.set(DRIVE_MOD, 0.5);
//! params.set(ALGORITHM, Algorithm::Tube.index() as f32);
//!
//! let mut chain = SignalChain::new(48000.0, 2).unwrap();
//! let visualizer = chain.visualizer();
//!
//! let mut left = vec![0.25f32; 512];
//! let mut right = vec![-0.25f32; 512];
//! chain
//!     .process_block(&params.snapshot(), &mut [&mut left, &mut right])
//!     .unwrap();
//!
//! assert!(left.iter().all(|s| s.is_finite()));
//! assert_eq!(visualizer.distortion_state().1, Algorithm::Tube);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod chain;
pub mod distortion;
pub mod gate;
pub mod modulated_filter;
pub mod params;
pub mod shared;
pub mod visualizer;

// Re-export main types at crate root
pub use chain::{ProcessError, SignalChain};
pub use distortion::{Algorithm, DistortionEngine, PREVIEW_POINTS, WaveshapePreview};
pub use gate::EnvelopeGate;
pub use modulated_filter::ModulatedFilter;
pub use params::{ChainParams, FilterParams, FilterRouting, FilterSlot, PARAM_COUNT};
pub use shared::{AtomicParams, VisualState};
pub use visualizer::Visualizer;
