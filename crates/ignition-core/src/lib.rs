//! Ignition Core - DSP primitives for the ignition distortion engine
//!
//! This crate provides the leaf building blocks of the signal chain, designed
//! for real-time audio processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for single-channel sample processors
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] - Peak envelope detector with asymmetric attack/release
//! - [`HistoryRing`] - Lock-free, fixed-capacity trace of decimated envelope values
//!
//! ## Filters
//!
//! - [`StateVariableFilter`] - TPT state variable filter (lowpass, highpass, bandpass)
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] / [`ParameterInfo`] - Discoverable parameter metadata
//!
//! ## Utilities
//!
//! - Waveshapers: [`hard_clip`], [`asymmetric_clip`], [`fuzz_clip`], [`rectify`]
//! - Math: [`flush_denormal`], [`wet_dry_mix`], [`lerp`], [`linear_to_db`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! ignition-core = { version = "0.1", default-features = false }
//! ```
//!
//! The history ring uses `alloc::sync::Arc`, so an allocator is required.
//!
//! # Example
//!
//! ```rust
//! use ignition_core::EnvelopeFollower;
//!
//! let mut env = EnvelopeFollower::with_config(0.01, 0.5, 48000.0).unwrap();
//! let reader = env.history_reader();
//!
//! for _ in 0..1024 {
//!     env.process(0.5);
//! }
//!
//! assert!(env.envelope() > 0.0);
//! assert_eq!(reader.len(), 4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod effect;
pub mod envelope;
pub mod error;
pub mod history;
pub mod math;
pub mod param_info;
pub mod svf;

// Re-export main types at crate root
pub use effect::Effect;
pub use envelope::{EnvelopeFollower, HISTORY_DECIMATION};
pub use error::ConfigError;
pub use history::{HISTORY_CAPACITY, HistoryReader, HistoryRing, HistoryWriter};
pub use math::{
    asymmetric_clip, flush_denormal, fuzz_clip, hard_clip, lerp, linear_to_db, rectify,
    soft_clip, wet_dry_mix,
};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use svf::{FilterType, MAX_CUTOFF_RATIO, MIN_CUTOFF, StateVariableFilter};
