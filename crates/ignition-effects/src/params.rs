//! Parameter layout and the typed per-block parameter snapshot.
//!
//! ## Parameter Indices
//!
//! | Index | String id | Range | Default |
//! |-------|-----------|-------|---------|
//! | 0 | `drive` | 0.01–20 | 1.0 |
//! | 1 | `drive_mod` | 0–1 | 0.0 |
//! | 2 | `algorithm` | 0–4 (stepped) | 0 |
//! | 3 | `pre_cutoff` | 200–20000 Hz (log) | 20000 |
//! | 4 | `pre_resonance` | 0–1 | 0.0 |
//! | 5 | `pre_cutoff_mod` | 0–1 | 0.0 |
//! | 6 | `pre_on` | off/on | off |
//! | 7 | `post_cutoff` | 200–20000 Hz (log) | 20000 |
//! | 8 | `post_resonance` | 0–1 | 0.0 |
//! | 9 | `post_cutoff_mod` | 0–1 | 0.0 |
//! | 10 | `post_on` | off/on | off |
//! | 11 | `filter_routing` | 0–2 (stepped) | 0 |
//! | 12 | `mix` | 0–1 | 1.0 |
//! | 13 | `gate` | 0–1 | 0.0 |
//! | 14 | `env_attack` | 0.1–1000 ms | 10 |
//! | 15 | `env_release` | 1–5000 ms | 500 |

use ignition_core::{ParamDescriptor, ParamId};
use libm::roundf;

use crate::distortion::Algorithm;

/// Number of chain parameters.
pub const PARAM_COUNT: usize = 16;

/// Index of the drive parameter.
pub const DRIVE: usize = 0;
/// Index of the drive modulation depth parameter.
pub const DRIVE_MOD: usize = 1;
/// Index of the algorithm selector.
pub const ALGORITHM: usize = 2;
/// Index of the pre-filter cutoff.
pub const PRE_CUTOFF: usize = 3;
/// Index of the pre-filter resonance.
pub const PRE_RESONANCE: usize = 4;
/// Index of the pre-filter cutoff modulation depth.
pub const PRE_CUTOFF_MOD: usize = 5;
/// Index of the pre-filter enable switch.
pub const PRE_ON: usize = 6;
/// Index of the post-filter cutoff.
pub const POST_CUTOFF: usize = 7;
/// Index of the post-filter resonance.
pub const POST_RESONANCE: usize = 8;
/// Index of the post-filter cutoff modulation depth.
pub const POST_CUTOFF_MOD: usize = 9;
/// Index of the post-filter enable switch.
pub const POST_ON: usize = 10;
/// Index of the filter routing selector.
pub const FILTER_ROUTING: usize = 11;
/// Index of the dry/wet mix.
pub const MIX: usize = 12;
/// Index of the gate threshold.
pub const GATE: usize = 13;
/// Index of the envelope attack time.
pub const ENV_ATTACK: usize = 14;
/// Index of the envelope release time.
pub const ENV_RELEASE: usize = 15;

const BASE_ID: u32 = 100;

/// Descriptors for every chain parameter, in index order.
pub static PARAM_DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::custom("Drive", "Drive", 0.01, 20.0, 1.0)
        .with_id(ParamId(BASE_ID), "drive")
        .with_group("distortion"),
    ParamDescriptor::unit_interval("Drive Mod", "DrvMod", 0.0)
        .with_id(ParamId(BASE_ID + 1), "drive_mod")
        .with_group("distortion"),
    ParamDescriptor::selector("Distortion Type", "Type", 4, 0)
        .with_id(ParamId(BASE_ID + 2), "algorithm")
        .with_group("distortion"),
    ParamDescriptor::frequency_hz("Pre-Filter Cutoff", "PreCut", 200.0, 20_000.0, 20_000.0)
        .with_id(ParamId(BASE_ID + 3), "pre_cutoff")
        .with_group("pre_filter"),
    ParamDescriptor::unit_interval("Pre-Filter Resonance", "PreRes", 0.0)
        .with_id(ParamId(BASE_ID + 4), "pre_resonance")
        .with_group("pre_filter"),
    ParamDescriptor::unit_interval("Pre-Filter Cutoff Mod", "PreMod", 0.0)
        .with_id(ParamId(BASE_ID + 5), "pre_cutoff_mod")
        .with_group("pre_filter"),
    ParamDescriptor::toggle("Pre-Filter On", "PreOn", false)
        .with_id(ParamId(BASE_ID + 6), "pre_on")
        .with_group("pre_filter"),
    ParamDescriptor::frequency_hz("Post-Filter Cutoff", "PostCut", 200.0, 20_000.0, 20_000.0)
        .with_id(ParamId(BASE_ID + 7), "post_cutoff")
        .with_group("post_filter"),
    ParamDescriptor::unit_interval("Post-Filter Resonance", "PostRes", 0.0)
        .with_id(ParamId(BASE_ID + 8), "post_resonance")
        .with_group("post_filter"),
    ParamDescriptor::unit_interval("Post-Filter Cutoff Mod", "PostMod", 0.0)
        .with_id(ParamId(BASE_ID + 9), "post_cutoff_mod")
        .with_group("post_filter"),
    ParamDescriptor::toggle("Post-Filter On", "PostOn", false)
        .with_id(ParamId(BASE_ID + 10), "post_on")
        .with_group("post_filter"),
    ParamDescriptor::selector("Filter Routing", "Routing", 2, 0)
        .with_id(ParamId(BASE_ID + 11), "filter_routing")
        .with_group("routing"),
    ParamDescriptor::unit_interval("Mix", "Mix", 1.0)
        .with_id(ParamId(BASE_ID + 12), "mix")
        .with_group("output"),
    ParamDescriptor::unit_interval("Gate", "Gate", 0.0)
        .with_id(ParamId(BASE_ID + 13), "gate")
        .with_group("output"),
    ParamDescriptor::time_ms("Envelope Attack", "EnvAtk", 0.1, 1000.0, 10.0)
        .with_id(ParamId(BASE_ID + 14), "env_attack")
        .with_group("envelope"),
    ParamDescriptor::time_ms("Envelope Release", "EnvRel", 1.0, 5000.0, 500.0)
        .with_id(ParamId(BASE_ID + 15), "env_release")
        .with_group("envelope"),
];

/// Descriptor for the parameter at `index`.
pub fn descriptor(index: usize) -> Option<&'static ParamDescriptor> {
    PARAM_DESCRIPTORS.get(index)
}

/// Index of the parameter whose string id matches `id` (case-insensitive).
///
/// ```rust
/// use ignition_effects::params::{self, MIX};
///
/// assert_eq!(params::index_of("mix"), Some(MIX));
/// assert_eq!(params::index_of("Pre_Cutoff"), Some(params::PRE_CUTOFF));
/// assert_eq!(params::index_of("volume"), None);
/// ```
pub fn index_of(id: &str) -> Option<usize> {
    PARAM_DESCRIPTORS
        .iter()
        .position(|d| d.string_id.eq_ignore_ascii_case(id))
}

/// Default value of every parameter, in index order.
pub fn default_values() -> [f32; PARAM_COUNT] {
    core::array::from_fn(|i| PARAM_DESCRIPTORS[i].default)
}

/// Decode an on/off parameter value.
#[inline]
pub fn decode_bool(value: f32) -> bool {
    value > 0.5
}

/// Decode a stepped parameter value: round, then bounds-check.
///
/// Returns `None` for negative, NaN or values above `max`.
#[inline]
pub fn decode_selector(value: f32, max: u32) -> Option<u32> {
    let rounded = roundf(value);
    if rounded >= 0.0 && rounded <= max as f32 {
        Some(rounded as u32)
    } else {
        None
    }
}

/// One of the two filter positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterSlot {
    /// Before the distortion.
    Pre,
    /// After the distortion.
    Post,
}

/// Which filters are active.
///
/// Selector values: `0` = independent switches, `1` = pre only, `2` = post only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterRouting {
    /// Each filter has its own switch; both, either or neither may run.
    Independent {
        /// Pre-filter enabled.
        pre: bool,
        /// Post-filter enabled.
        post: bool,
    },
    /// Exactly one filter runs, regardless of the switches.
    Exclusive(FilterSlot),
}

impl Default for FilterRouting {
    fn default() -> Self {
        FilterRouting::Independent {
            pre: false,
            post: false,
        }
    }
}

impl FilterRouting {
    /// Build from the routing selector and the two enable switches.
    ///
    /// Unknown selectors fall back to independent switching.
    pub fn from_selector(selector: u32, pre_on: bool, post_on: bool) -> Self {
        match selector {
            1 => FilterRouting::Exclusive(FilterSlot::Pre),
            2 => FilterRouting::Exclusive(FilterSlot::Post),
            _ => FilterRouting::Independent {
                pre: pre_on,
                post: post_on,
            },
        }
    }

    /// Routing selector value.
    pub fn selector(self) -> u32 {
        match self {
            FilterRouting::Independent { .. } => 0,
            FilterRouting::Exclusive(FilterSlot::Pre) => 1,
            FilterRouting::Exclusive(FilterSlot::Post) => 2,
        }
    }

    /// Whether the filter in `slot` runs.
    pub fn is_enabled(self, slot: FilterSlot) -> bool {
        match self {
            FilterRouting::Independent { pre, post } => match slot {
                FilterSlot::Pre => pre,
                FilterSlot::Post => post,
            },
            FilterRouting::Exclusive(only) => only == slot,
        }
    }

    /// Whether the pre-filter runs.
    pub fn pre_enabled(self) -> bool {
        self.is_enabled(FilterSlot::Pre)
    }

    /// Whether the post-filter runs.
    pub fn post_enabled(self) -> bool {
        self.is_enabled(FilterSlot::Post)
    }
}

/// Settings for one modulated filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Base cutoff in Hz.
    pub cutoff_hz: f32,
    /// Normalized resonance in `[0, 1]`.
    pub resonance: f32,
    /// Envelope-to-cutoff modulation depth in `[0, 1]`.
    pub cutoff_mod: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff_hz: 20_000.0,
            resonance: 0.0,
            cutoff_mod: 0.0,
        }
    }
}

/// Typed snapshot of every chain parameter, read once per block.
///
/// Built from raw values with [`ChainParams::from_values`], which clamps every
/// value to its descriptor and decodes switches and selectors explicitly.
///
/// # Example
///
/// ```rust
/// use ignition_effects::{Algorithm, ChainParams, FilterRouting, FilterSlot};
/// use ignition_effects::params::{self, ALGORITHM, FILTER_ROUTING, POST_ON};
///
/// let mut values = params::default_values();
/// values[ALGORITHM] = 2.2;
/// values[FILTER_ROUTING] = 2.0;
/// values[POST_ON] = 0.0;
///
/// let p = ChainParams::from_values(&values);
/// assert_eq!(p.algorithm, Algorithm::Fuzz);
/// assert_eq!(p.routing, FilterRouting::Exclusive(FilterSlot::Post));
/// assert!(p.routing.post_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParams {
    /// Base drive, 0.01–20.
    pub drive: f32,
    /// Envelope-to-drive modulation depth, 0–1.
    pub drive_mod: f32,
    /// Waveshaping algorithm.
    pub algorithm: Algorithm,
    /// Pre-distortion filter settings.
    pub pre: FilterParams,
    /// Post-distortion filter settings.
    pub post: FilterParams,
    /// Which filters run.
    pub routing: FilterRouting,
    /// Dry/wet mix, 0 = dry, 1 = wet.
    pub mix: f32,
    /// Gate threshold on the pre-effect envelope; 0 disables the gate.
    pub gate: f32,
    /// Envelope attack in milliseconds.
    pub attack_ms: f32,
    /// Envelope release in milliseconds.
    pub release_ms: f32,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::from_values(&default_values())
    }
}

impl ChainParams {
    /// Decode raw parameter values.
    ///
    /// Every value is clamped to its descriptor range first (NaN becomes the
    /// default), so the result is always within range.
    pub fn from_values(values: &[f32; PARAM_COUNT]) -> Self {
        let v = |i: usize| PARAM_DESCRIPTORS[i].clamp(values[i]);

        let algorithm = decode_selector(v(ALGORITHM), 4)
            .map(Algorithm::from_index)
            .unwrap_or_default();
        let routing = FilterRouting::from_selector(
            decode_selector(v(FILTER_ROUTING), 2).unwrap_or(0),
            decode_bool(v(PRE_ON)),
            decode_bool(v(POST_ON)),
        );

        Self {
            drive: v(DRIVE),
            drive_mod: v(DRIVE_MOD),
            algorithm,
            pre: FilterParams {
                cutoff_hz: v(PRE_CUTOFF),
                resonance: v(PRE_RESONANCE),
                cutoff_mod: v(PRE_CUTOFF_MOD),
            },
            post: FilterParams {
                cutoff_hz: v(POST_CUTOFF),
                resonance: v(POST_RESONANCE),
                cutoff_mod: v(POST_CUTOFF_MOD),
            },
            routing,
            mix: v(MIX),
            gate: v(GATE),
            attack_ms: v(ENV_ATTACK),
            release_ms: v(ENV_RELEASE),
        }
    }

    /// Encode back into raw values.
    ///
    /// Exclusive routing writes its slot's switch on and the other off.
    pub fn to_values(&self) -> [f32; PARAM_COUNT] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let mut values = [0.0; PARAM_COUNT];
        values[DRIVE] = self.drive;
        values[DRIVE_MOD] = self.drive_mod;
        values[ALGORITHM] = self.algorithm.index() as f32;
        values[PRE_CUTOFF] = self.pre.cutoff_hz;
        values[PRE_RESONANCE] = self.pre.resonance;
        values[PRE_CUTOFF_MOD] = self.pre.cutoff_mod;
        values[PRE_ON] = flag(self.routing.pre_enabled());
        values[POST_CUTOFF] = self.post.cutoff_hz;
        values[POST_RESONANCE] = self.post.resonance;
        values[POST_CUTOFF_MOD] = self.post.cutoff_mod;
        values[POST_ON] = flag(self.routing.post_enabled());
        values[FILTER_ROUTING] = self.routing.selector() as f32;
        values[MIX] = self.mix;
        values[GATE] = self.gate;
        values[ENV_ATTACK] = self.attack_ms;
        values[ENV_RELEASE] = self.release_ms;
        values
    }

    /// Copy with every value clamped to its descriptor range.
    pub fn sanitized(&self) -> Self {
        Self::from_values(&self.to_values())
    }
}
