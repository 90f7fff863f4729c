//! The signal chain: envelope, filters, distortion, gate and mix per sample.
//!
//! ```text
//! dry ──┬──────────────────────────────────────────────────┐
//!       ├─> env ─┬─> cutoff mod ─┬─> drive mod ─┐          │
//!       │        │               │              │          │
//!       └─> [pre-filter] ──> distortion ──> [post-filter] ─> gate ─> mix ─> out
//!                                                                          │
//!                                                  output envelope <───────┘
//! ```
//!
//! Configuration is shared across channels; all per-sample state (envelope
//! followers, filter integrators, Downsample carry, gate gain) is owned per
//! channel. Only channel 0 records envelope history and publishes visual
//! state.

use alloc::sync::Arc;
use alloc::vec::Vec;

use ignition_core::{ConfigError, Effect, EnvelopeFollower, HistoryReader, wet_dry_mix};

use crate::distortion::{DistortionEngine, WaveshapePreview};
use crate::gate::EnvelopeGate;
use crate::modulated_filter::ModulatedFilter;
use crate::params::{ChainParams, FilterParams};
use crate::shared::VisualState;
use crate::visualizer::Visualizer;

/// Block-level shape errors.
///
/// Reported before any sample is processed; the chain is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessError {
    /// The block has more channels than the chain was prepared for.
    TooManyChannels {
        /// Channels in the block.
        got: usize,
        /// Channels prepared.
        prepared: usize,
    },
    /// Input and output blocks have a different number of channels.
    ChannelCountMismatch {
        /// Input channels.
        input: usize,
        /// Output channels.
        output: usize,
    },
    /// A channel's length differs from the block length.
    ShapeMismatch {
        /// Offending channel (for in-place blocks) or channel pair.
        channel: usize,
        /// Expected sample count.
        expected: usize,
        /// Actual sample count.
        got: usize,
    },
}

impl core::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooManyChannels { got, prepared } => {
                write!(f, "block has {got} channels, chain prepared for {prepared}")
            }
            Self::ChannelCountMismatch { input, output } => {
                write!(f, "input has {input} channels, output has {output}")
            }
            Self::ShapeMismatch {
                channel,
                expected,
                got,
            } => write!(
                f,
                "channel {channel} has {got} samples, expected {expected}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProcessError {}

/// Per-channel sample state.
#[derive(Debug)]
struct ChannelState {
    input_env: EnvelopeFollower,
    output_env: EnvelopeFollower,
    distortion: DistortionEngine,
    gate: EnvelopeGate,
}

impl ChannelState {
    fn new(sample_rate: f32, params: &ChainParams) -> Result<Self, ConfigError> {
        let attack_s = params.attack_ms / 1000.0;
        let release_s = params.release_ms / 1000.0;
        let mut state = Self {
            input_env: EnvelopeFollower::with_config(attack_s, release_s, sample_rate)?,
            output_env: EnvelopeFollower::with_config(attack_s, release_s, sample_rate)?,
            distortion: DistortionEngine::new(),
            gate: EnvelopeGate::new(sample_rate),
        };
        state.apply(params);
        Ok(state)
    }

    fn apply(&mut self, params: &ChainParams) {
        self.distortion.set_drive(params.drive);
        self.distortion.set_algorithm(params.algorithm);
        self.gate.set_threshold(params.gate);
    }

    fn reconfigure(
        &mut self,
        attack_s: f32,
        release_s: f32,
        sample_rate: f32,
    ) -> Result<(), ConfigError> {
        self.input_env.configure(attack_s, release_s, sample_rate)?;
        self.output_env.configure(attack_s, release_s, sample_rate)?;
        self.gate.set_sample_rate(sample_rate);
        Ok(())
    }

    fn reset(&mut self) {
        self.input_env.reset();
        self.output_env.reset();
        self.distortion.reset();
        self.gate.reset();
    }
}

/// Pre- and post-distortion filters.
#[derive(Debug, Clone)]
struct Filters {
    pre: ModulatedFilter,
    post: ModulatedFilter,
}

impl Filters {
    fn prepare(&mut self, sample_rate: f32, channels: usize) -> Result<(), ConfigError> {
        self.pre.prepare(sample_rate, channels)?;
        self.post.prepare(sample_rate, channels)
    }
}

fn configure_filter(filter: &mut ModulatedFilter, params: &FilterParams) {
    filter.set_cutoff(params.cutoff_hz);
    filter.set_resonance(params.resonance);
    filter.set_cutoff_mod(params.cutoff_mod);
}

/// Multi-channel envelope-driven distortion chain.
///
/// Owns every piece of DSP state. Call [`prepare`](Self::prepare) whenever
/// the sample rate or channel layout changes, then
/// [`process_block`](Self::process_block) once per audio block with that
/// block's parameter snapshot. The per-block path never allocates or locks.
///
/// # Example
///
/// ```rust
/// use ignition_effects::{ChainParams, SignalChain};
///
/// let mut chain = SignalChain::new(48000.0, 2).unwrap();
/// let params = ChainParams {
///     mix: 0.0,
///     ..ChainParams::default()
/// };
///
/// let mut left = [0.1, -0.4, 0.8];
/// let mut right = [0.0, 0.5, -0.5];
/// chain.process_block(&params, &mut [&mut left, &mut right]).unwrap();
///
/// // Fully dry
/// assert_eq!(left, [0.1, -0.4, 0.8]);
/// assert_eq!(right, [0.0, 0.5, -0.5]);
/// ```
#[derive(Debug)]
pub struct SignalChain {
    sample_rate: f32,
    channels: Vec<ChannelState>,
    filters: Filters,
    params: ChainParams,
    visual: Arc<VisualState>,
    input_history: HistoryReader,
    output_history: HistoryReader,
}

impl SignalChain {
    /// Create a chain for `channels` channels at `sample_rate`, with default
    /// parameters.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite sample rates and zero channels.
    pub fn new(sample_rate: f32, channels: usize) -> Result<Self, ConfigError> {
        validate(sample_rate, channels)?;
        let params = ChainParams::default();

        let mut filters = Filters {
            pre: ModulatedFilter::new(),
            post: ModulatedFilter::new(),
        };
        filters.prepare(sample_rate, channels)?;
        configure_filter(&mut filters.pre, &params.pre);
        configure_filter(&mut filters.post, &params.post);

        let mut states = Vec::with_capacity(channels);
        for _ in 0..channels {
            states.push(ChannelState::new(sample_rate, &params)?);
        }
        let (input_history, output_history) = match states.first_mut() {
            Some(first) => (
                first.input_env.history_reader(),
                first.output_env.history_reader(),
            ),
            None => return Err(ConfigError::InvalidChannelCount(channels)),
        };

        Ok(Self {
            sample_rate,
            channels: states,
            filters,
            params,
            visual: Arc::new(VisualState::new()),
            input_history,
            output_history,
        })
    }

    /// Reconfigure for a new sample rate and channel count.
    ///
    /// Recomputes every coefficient and resets all per-sample state. Channel
    /// 0 keeps its history rings, so existing [`Visualizer`] handles stay
    /// connected. Allocates; call between blocks only.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite sample rates and zero channels,
    /// leaving the chain unchanged.
    pub fn prepare(&mut self, sample_rate: f32, channels: usize) -> Result<(), ConfigError> {
        if let Err(err) = validate(sample_rate, channels) {
            #[cfg(feature = "tracing")]
            tracing::warn!(%err, sample_rate, channels, "rejected chain configuration");
            return Err(err);
        }

        let attack_s = self.params.attack_ms / 1000.0;
        let release_s = self.params.release_ms / 1000.0;

        self.filters.prepare(sample_rate, channels)?;
        configure_filter(&mut self.filters.pre, &self.params.pre);
        configure_filter(&mut self.filters.post, &self.params.post);

        self.channels.truncate(channels);
        for state in &mut self.channels {
            state.reconfigure(attack_s, release_s, sample_rate)?;
            state.reset();
        }
        while self.channels.len() < channels {
            self.channels
                .push(ChannelState::new(sample_rate, &self.params)?);
        }
        self.sample_rate = sample_rate;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, channels, "signal chain prepared");
        Ok(())
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of prepared channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Parameters applied by the most recent block.
    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Apply a parameter snapshot without processing audio.
    ///
    /// Values are clamped to their descriptor ranges. Envelope coefficients
    /// are recomputed only when attack or release changed.
    pub fn apply_params(&mut self, params: &ChainParams) {
        let params = params.sanitized();

        configure_filter(&mut self.filters.pre, &params.pre);
        configure_filter(&mut self.filters.post, &params.post);

        let timing_changed =
            params.attack_ms != self.params.attack_ms || params.release_ms != self.params.release_ms;
        let attack_s = params.attack_ms / 1000.0;
        let release_s = params.release_ms / 1000.0;

        for state in &mut self.channels {
            state.apply(&params);
            if timing_changed
                && let Err(_err) = state.reconfigure(attack_s, release_s, self.sample_rate)
            {
                #[cfg(feature = "tracing")]
                tracing::warn!(err = %_err, "envelope timing rejected");
            }
        }
        self.params = params;
    }

    /// Process a block in place.
    ///
    /// `channels` may hold fewer channels than prepared; every channel must
    /// have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] for more channels than prepared or ragged
    /// channel lengths. Nothing is processed in that case.
    pub fn process_block(
        &mut self,
        params: &ChainParams,
        channels: &mut [&mut [f32]],
    ) -> Result<(), ProcessError> {
        self.check_channel_count(channels.len())?;
        let frames = channels.first().map_or(0, |c| c.len());
        for (channel, samples) in channels.iter().enumerate() {
            check_len(channel, frames, samples.len())?;
        }

        self.apply_params(params);
        for (ch, samples) in channels.iter_mut().enumerate() {
            let state = &mut self.channels[ch];
            for sample in samples.iter_mut() {
                *sample = tick(state, &mut self.filters, &self.params, ch, *sample);
            }
        }
        self.publish_visual_state();
        Ok(())
    }

    /// Process an input block into an output block of identical shape.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when the input and output shapes differ or
    /// there are more channels than prepared. Nothing is processed in that
    /// case.
    pub fn process_block_into(
        &mut self,
        params: &ChainParams,
        input: &[&[f32]],
        output: &mut [&mut [f32]],
    ) -> Result<(), ProcessError> {
        if input.len() != output.len() {
            return Err(ProcessError::ChannelCountMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        self.check_channel_count(input.len())?;
        let frames = input.first().map_or(0, |c| c.len());
        for (channel, (inp, out)) in input.iter().zip(output.iter()).enumerate() {
            check_len(channel, frames, inp.len())?;
            check_len(channel, frames, out.len())?;
        }

        self.apply_params(params);
        for (ch, (inp, out)) in input.iter().zip(output.iter_mut()).enumerate() {
            let state = &mut self.channels[ch];
            for (x, y) in inp.iter().zip(out.iter_mut()) {
                *y = tick(state, &mut self.filters, &self.params, ch, *x);
            }
        }
        self.publish_visual_state();
        Ok(())
    }

    /// Zero every envelope, filter integrator, Downsample carry and gate.
    ///
    /// Parameters and history contents are kept.
    pub fn reset(&mut self) {
        for state in &mut self.channels {
            state.reset();
        }
        self.filters.pre.reset();
        self.filters.post.reset();
    }

    /// Thread-safe handle for pulling visualization data.
    pub fn visualizer(&self) -> Visualizer {
        Visualizer::new(
            self.input_history.clone(),
            self.output_history.clone(),
            Arc::clone(&self.visual),
        )
    }

    /// Decimated pre-effect envelope of channel 0, oldest first.
    pub fn envelope_history(&self) -> Vec<f32> {
        self.input_history.to_vec()
    }

    /// Decimated output envelope of channel 0, oldest first.
    pub fn post_envelope_history(&self) -> Vec<f32> {
        self.output_history.to_vec()
    }

    /// Transfer curve at the current drive, algorithm and channel 0
    /// modulation. Never touches live distortion state.
    pub fn waveshape_preview(&self) -> WaveshapePreview {
        match self.channels.first() {
            Some(state) => state.distortion.waveshape_preview(),
            None => DistortionEngine::new().waveshape_preview(),
        }
    }

    fn check_channel_count(&self, got: usize) -> Result<(), ProcessError> {
        if got > self.channels.len() {
            return Err(ProcessError::TooManyChannels {
                got,
                prepared: self.channels.len(),
            });
        }
        Ok(())
    }

    fn publish_visual_state(&self) {
        if let Some(state) = self.channels.first() {
            self.visual.publish(
                state.distortion.drive(),
                state.distortion.algorithm(),
                state.distortion.modulation(),
            );
        }
    }
}

fn validate(sample_rate: f32, channels: usize) -> Result<(), ConfigError> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(ConfigError::InvalidSampleRate(sample_rate));
    }
    if channels == 0 {
        return Err(ConfigError::InvalidChannelCount(channels));
    }
    Ok(())
}

#[inline]
fn check_len(channel: usize, expected: usize, got: usize) -> Result<(), ProcessError> {
    if expected != got {
        return Err(ProcessError::ShapeMismatch {
            channel,
            expected,
            got,
        });
    }
    Ok(())
}

/// Run one sample through the chain.
#[inline]
fn tick(
    state: &mut ChannelState,
    filters: &mut Filters,
    params: &ChainParams,
    channel: usize,
    dry: f32,
) -> f32 {
    let env = state.input_env.process(dry);

    let mut wet = dry;
    if params.routing.pre_enabled() {
        wet = filters.pre.process_modulated(channel, wet, env);
    }

    state.distortion.set_modulation(env * params.drive_mod);
    wet = state.distortion.process(wet);

    if params.routing.post_enabled() {
        wet = filters.post.process_modulated(channel, wet, env);
    }

    wet = state.gate.process(wet, env);

    let out = wet_dry_mix(dry, wet, params.mix);
    state.output_env.process(out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distortion::Algorithm;
    use crate::params::{FilterRouting, FilterSlot};
    use ignition_core::HISTORY_DECIMATION;

    fn sine(len: usize, freq: f32, sr: f32, amp: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amp * libm::sinf(core::f32::consts::TAU * freq * i as f32 / sr))
            .collect()
    }

    #[test]
    fn test_rejects_bad_config() {
        assert_eq!(
            SignalChain::new(0.0, 2).unwrap_err(),
            ConfigError::InvalidSampleRate(0.0)
        );
        assert_eq!(
            SignalChain::new(48_000.0, 0).unwrap_err(),
            ConfigError::InvalidChannelCount(0)
        );

        let mut chain = SignalChain::new(48_000.0, 2).unwrap();
        assert!(chain.prepare(f32::NAN, 2).is_err());
        assert!(chain.prepare(48_000.0, 0).is_err());
        assert_eq!(chain.channel_count(), 2);
        assert_eq!(chain.sample_rate(), 48_000.0);
    }

    #[test]
    fn test_identity_pipeline() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let params = ChainParams::default();
        let input = sine(1024, 440.0, 48_000.0, 0.9);
        let mut buf = input.clone();
        chain.process_block(&params, &mut [&mut buf]).unwrap();
        assert_eq!(buf, input);
    }

    #[test]
    fn test_dry_mix_is_exact() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let params = ChainParams {
            drive: 15.0,
            drive_mod: 1.0,
            algorithm: Algorithm::Fuzz,
            routing: FilterRouting::Independent {
                pre: true,
                post: true,
            },
            mix: 0.0,
            gate: 0.3,
            ..ChainParams::default()
        };
        let input = sine(2048, 220.0, 48_000.0, 0.7);
        let mut buf = input.clone();
        chain.process_block(&params, &mut [&mut buf]).unwrap();
        assert_eq!(buf, input);
    }

    #[test]
    fn test_extreme_input_does_not_poison_filters() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let mut params = ChainParams {
            drive: 8.0,
            drive_mod: 1.0,
            routing: FilterRouting::Independent {
                pre: true,
                post: true,
            },
            mix: 0.0,
            ..ChainParams::default()
        };
        params.pre.cutoff_mod = 1.0;
        params.post.cutoff_mod = 1.0;

        let input = [
            3e38,
            -3e38,
            3e38,
            -3e38,
            f32::NAN,
            f32::INFINITY,
            f32::NEG_INFINITY,
            3e38,
        ];
        let mut buf = input.to_vec();
        chain.process_block(&params, &mut [&mut buf]).unwrap();
        for (out, x) in buf.iter().zip(&input) {
            assert_eq!(out.to_bits(), x.to_bits());
        }

        params.mix = 1.0;
        let mut buf = vec![0.1; 256];
        chain.process_block(&params, &mut [&mut buf]).unwrap();
        assert!(buf.iter().all(|s| s.is_finite()), "{buf:?}");
    }

    #[test]
    fn test_shape_errors_leave_state_untouched() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let params = ChainParams {
            drive: 5.0,
            ..ChainParams::default()
        };

        let mut a = [0.5; 8];
        let mut b = [0.5; 8];
        assert_eq!(
            chain.process_block(&params, &mut [&mut a, &mut b]),
            Err(ProcessError::TooManyChannels {
                got: 2,
                prepared: 1
            })
        );
        assert_eq!(a, [0.5; 8]);
        assert_eq!(chain.params().drive, 1.0);

        let input = [0.1; 4];
        let mut out = [0.0; 3];
        assert_eq!(
            chain.process_block_into(&params, &[&input], &mut [&mut out]),
            Err(ProcessError::ShapeMismatch {
                channel: 0,
                expected: 4,
                got: 3
            })
        );
        assert_eq!(
            chain.process_block_into(&params, &[&input], &mut []),
            Err(ProcessError::ChannelCountMismatch {
                input: 1,
                output: 0
            })
        );
        assert_eq!(out, [0.0; 3]);
    }

    #[test]
    fn test_ragged_channels_rejected() {
        let mut chain = SignalChain::new(48_000.0, 2).unwrap();
        let mut a = [0.0; 8];
        let mut b = [0.0; 7];
        let err = chain
            .process_block(&ChainParams::default(), &mut [&mut a, &mut b])
            .unwrap_err();
        assert_eq!(
            err,
            ProcessError::ShapeMismatch {
                channel: 1,
                expected: 8,
                got: 7
            }
        );
    }

    #[test]
    fn test_into_matches_in_place() {
        let params = ChainParams {
            drive: 6.0,
            drive_mod: 0.5,
            algorithm: Algorithm::Tube,
            routing: FilterRouting::Exclusive(FilterSlot::Post),
            post: FilterParams {
                cutoff_hz: 2_000.0,
                resonance: 0.4,
                cutoff_mod: 0.3,
            },
            mix: 0.7,
            ..ChainParams::default()
        };
        let input = sine(512, 330.0, 44_100.0, 0.6);

        let mut a = SignalChain::new(44_100.0, 1).unwrap();
        let mut in_place = input.clone();
        a.process_block(&params, &mut [&mut in_place]).unwrap();

        let mut b = SignalChain::new(44_100.0, 1).unwrap();
        let mut out = vec![0.0; input.len()];
        b.process_block_into(&params, &[&input], &mut [&mut out])
            .unwrap();

        assert_eq!(in_place, out);
    }

    #[test]
    fn test_gate_mutes_quiet_signal() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let params = ChainParams {
            drive: 10.0,
            gate: 0.5,
            ..ChainParams::default()
        };
        let mut buf = sine(4800, 200.0, 48_000.0, 0.05);
        chain.process_block(&params, &mut [&mut buf]).unwrap();
        assert!(buf[200..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_history_recorded_on_channel_zero() {
        let mut chain = SignalChain::new(48_000.0, 2).unwrap();
        let n = HISTORY_DECIMATION as usize * 10;
        let mut left = vec![0.5; n];
        let mut right = vec![0.5; n];
        chain
            .process_block(&ChainParams::default(), &mut [&mut left, &mut right])
            .unwrap();

        assert_eq!(chain.envelope_history().len(), 10);
        assert_eq!(chain.post_envelope_history().len(), 10);
        assert!(chain.envelope_history().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_prepare_keeps_history_connection() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let vis = chain.visualizer();
        chain.prepare(96_000.0, 2).unwrap();

        let n = HISTORY_DECIMATION as usize * 3;
        let mut left = vec![0.25; n];
        let mut right = vec![0.25; n];
        chain
            .process_block(&ChainParams::default(), &mut [&mut left, &mut right])
            .unwrap();
        assert_eq!(vis.envelope_history().len(), 3);
    }

    #[test]
    fn test_preview_tracks_published_settings() {
        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let vis = chain.visualizer();
        let params = ChainParams {
            drive: 4.0,
            algorithm: Algorithm::HardClip,
            ..ChainParams::default()
        };
        let mut buf = [0.0; 64];
        chain.process_block(&params, &mut [&mut buf]).unwrap();

        assert_eq!(vis.waveshape_preview(), chain.waveshape_preview());
        assert_eq!(chain.waveshape_preview()[0], (-1.0, -1.0));
    }

    #[test]
    fn test_reset_restores_initial_response() {
        let params = ChainParams {
            drive: 3.0,
            algorithm: Algorithm::Downsample,
            routing: FilterRouting::Exclusive(FilterSlot::Pre),
            pre: FilterParams {
                cutoff_hz: 800.0,
                resonance: 0.5,
                cutoff_mod: 0.5,
            },
            ..ChainParams::default()
        };
        let input = sine(300, 500.0, 48_000.0, 0.8);

        let mut chain = SignalChain::new(48_000.0, 1).unwrap();
        let mut first = input.clone();
        chain.process_block(&params, &mut [&mut first]).unwrap();

        chain.reset();
        let mut second = input.clone();
        chain.process_block(&params, &mut [&mut second]).unwrap();
        assert_eq!(first, second);
    }
}
