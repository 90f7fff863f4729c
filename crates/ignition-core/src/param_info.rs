//! Parameter introspection for discoverable processor parameters.
//!
//! The [`ParameterInfo`] trait and [`ParamDescriptor`] metadata let a
//! parameter store, a preset loader or a CLI enumerate, validate and
//! normalize parameters without knowing the concrete processor.
//!
//! Parameters are addressed by zero-based index. Each descriptor also carries
//! a stable numeric [`ParamId`] and a stable `string_id` used in preset files.
//!
//! # Example
//!
//! ```rust
//! use ignition_core::{ParamDescriptor, ParamId, ParameterInfo};
//!
//! struct Level {
//!     amount: f32,
//! }
//!
//! const LEVEL: ParamDescriptor =
//!     ParamDescriptor::unit_interval("Level", "Level", 0.5).with_id(ParamId(1), "level");
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         (index == 0).then_some(LEVEL)
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.amount } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.amount = LEVEL.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut level = Level { amount: 0.5 };
//! level.set_param(0, 3.0);
//! assert_eq!(level.get_param(0), 1.0);
//! assert_eq!(level.find_param_by_name("level"), Some(0));
//! ```

/// Scaling curve for parameter normalization.
///
/// Determines how a parameter's plain value maps to normalized \[0.0, 1.0\] space.
///
/// # Normalization Formulas
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`
/// - **Power(exp)**: `normalized = ((value - min) / (max - min)).powf(1.0 / exp)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default). Equal resolution across the range.
    #[default]
    Linear,
    /// Logarithmic mapping. More resolution at low values; requires `min > 0.0`.
    /// Used for cutoff frequencies.
    Logarithmic,
    /// Power curve mapping. exponent < 1.0 gives more resolution at the low end.
    Power(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` never changes for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// # Example
///
/// ```rust
/// use ignition_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!flags.contains(ParamFlags::BOOLEAN));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Can be changed continuously while audio runs.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Discrete integer steps (selectors).
    pub const STEPPED: Self = Self(1 << 1);
    /// On/off switch; decoded as `value > 0.5`.
    pub const BOOLEAN: Self = Self(1 << 2);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for processors that expose introspectable parameters.
///
/// Indices must be stable for the lifetime of the implementor. Use
/// [`param_count`](Self::param_count) to determine valid indices.
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value at `index`. Out-of-range indices return `0.0`.
    fn get_param(&self, index: usize) -> f32;

    /// Set the value at `index`, clamped to the descriptor's range.
    ///
    /// Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches [`ParamDescriptor::string_id`], [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.string_id.eq_ignore_ascii_case(name)
                    || desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// O(n) scan; for setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// All constructors and builders are `const`, so descriptor tables can live
/// in `const` or `static` items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Pre-Filter Cutoff").
    pub name: &'static str,

    /// Short name, max 8 characters (e.g., "PreCut").
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value on construction and reset.
    pub default: f32,

    /// Recommended increment for encoder-style control.
    pub step: f32,

    /// Stable numeric ID. Default `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Stable string ID used in presets and on the command line.
    pub string_id: &'static str,

    /// Normalization curve.
    pub scale: ParamScale,

    /// Capability flags.
    pub flags: ParamFlags,

    /// Parameter group for display (e.g., `"pre_filter"`). Empty means top level.
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Continuous parameter with a custom range and no unit.
    pub const fn custom(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            group: "",
        }
    }

    /// Amount in \[0, 1\], displayed as a percentage.
    pub const fn unit_interval(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self::custom(name, short_name, 0.0, 1.0, default).with_unit(ParamUnit::Percent)
    }

    /// Frequency in Hz with logarithmic scaling.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        let mut desc = Self::custom(name, short_name, min, max, default)
            .with_unit(ParamUnit::Hertz)
            .with_scale(ParamScale::Logarithmic);
        desc.step = 1.0;
        desc
    }

    /// Time in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        let mut desc = Self::custom(name, short_name, min, max, default)
            .with_unit(ParamUnit::Milliseconds);
        desc.step = 0.1;
        desc
    }

    /// On/off switch stored as 0.0 or 1.0.
    pub const fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        let mut desc = Self::custom(name, short_name, 0.0, 1.0, if default_on { 1.0 } else { 0.0 })
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::BOOLEAN));
        desc.step = 1.0;
        desc
    }

    /// Integer selector over `0..=max`.
    pub const fn selector(name: &'static str, short_name: &'static str, max: u32, default: u32) -> Self {
        let mut desc = Self::custom(name, short_name, 0.0, max as f32, default as f32)
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED));
        desc.step = 1.0;
        desc
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ignition_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::unit_interval("Mix", "Mix", 1.0).with_id(ParamId(12), "mix");
    /// assert_eq!(desc.id, ParamId(12));
    /// assert_eq!(desc.string_id, "mix");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the display unit.
    pub const fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the parameter group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// True for on/off switches.
    pub const fn is_boolean(&self) -> bool {
        self.flags.contains(ParamFlags::BOOLEAN)
    }

    /// True for integer selectors.
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ignition_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::custom("Drive", "Drive", 0.01, 20.0, 1.0);
    /// assert_eq!(desc.clamp(5.0), 5.0);
    /// assert_eq!(desc.clamp(-1.0), 0.01);
    /// assert_eq!(desc.clamp(100.0), 20.0);
    /// assert_eq!(desc.clamp(f32::NAN), 1.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Whether `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    ///
    /// # Example
    ///
    /// ```rust
    /// use ignition_core::ParamDescriptor;
    ///
    /// let cutoff = ParamDescriptor::frequency_hz("Cutoff", "Cutoff", 200.0, 20000.0, 20000.0);
    /// assert_eq!(cutoff.normalize(200.0), 0.0);
    /// assert!((cutoff.normalize(2000.0) - 0.5).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
            ParamScale::Power(exp) => {
                let linear = (value - self.min) / range;
                libm::powf(linear, 1.0 / exp)
            }
        }
    }

    /// Converts a normalized value (0.0 to 1.0) to the plain range.
    ///
    /// Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
            ParamScale::Power(exp) => {
                let curved = libm::powf(normalized, exp);
                self.min + curved * (self.max - self.min)
            }
        }
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz (Hz) for cutoff frequencies.
    Hertz,
    /// Milliseconds (ms) for envelope timing.
    Milliseconds,
    /// A \[0, 1\] fraction shown as a percentage.
    Percent,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Unit suffix for display.
    ///
    /// ```rust
    /// use ignition_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }

    /// Scale a stored value for display (fractions become percentages).
    pub fn display_value(&self, value: f32) -> f32 {
        match self {
            ParamUnit::Percent => value * 100.0,
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAIN: ParamDescriptor =
        ParamDescriptor::custom("Gain", "Gain", 0.0, 4.0, 1.0).with_id(ParamId(100), "test_gain");
    const ON: ParamDescriptor = ParamDescriptor::toggle("Enabled", "On", false).with_id(ParamId(101), "test_on");

    struct TestProcessor {
        gain: f32,
        on: f32,
    }

    impl ParameterInfo for TestProcessor {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(GAIN),
                1 => Some(ON),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.gain,
                1 => self.on,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            match index {
                0 => self.gain = GAIN.clamp(value),
                1 => self.on = ON.clamp(value),
                _ => {}
            }
        }
    }

    #[test]
    fn test_find_param_by_name() {
        let p = TestProcessor { gain: 1.0, on: 0.0 };
        assert_eq!(p.find_param_by_name("test_gain"), Some(0));
        assert_eq!(p.find_param_by_name("ENABLED"), Some(1));
        assert_eq!(p.find_param_by_name("on"), Some(1));
        assert_eq!(p.find_param_by_name("missing"), None);
    }

    #[test]
    fn test_param_index_by_id() {
        let p = TestProcessor { gain: 1.0, on: 0.0 };
        assert_eq!(p.param_index_by_id(ParamId(101)), Some(1));
        assert_eq!(p.param_index_by_id(ParamId(7)), None);
    }

    #[test]
    fn test_set_param_clamps() {
        let mut p = TestProcessor { gain: 1.0, on: 0.0 };
        p.set_param(0, 10.0);
        assert_eq!(p.get_param(0), 4.0);
        p.set_param(5, 1.0);
        assert_eq!(p.get_param(5), 0.0);
    }

    #[test]
    fn test_toggle_and_selector_flags() {
        assert!(ON.is_boolean());
        assert!(!ON.is_stepped());
        let sel = ParamDescriptor::selector("Type", "Type", 4, 0);
        assert!(sel.is_stepped());
        assert_eq!(sel.max, 4.0);
        assert_eq!(sel.step, 1.0);
    }

    #[test]
    fn test_log_scale_roundtrip_endpoints() {
        let desc = ParamDescriptor::frequency_hz("Cutoff", "Cut", 200.0, 20_000.0, 20_000.0);
        assert!((desc.denormalize(0.0) - 200.0).abs() < 1e-3);
        assert!((desc.denormalize(1.0) - 20_000.0).abs() < 0.5);
        assert!((desc.normalize(20_000.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains() {
        assert!(GAIN.contains(0.0));
        assert!(GAIN.contains(4.0));
        assert!(!GAIN.contains(4.01));
        assert!(!GAIN.contains(f32::NAN));
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(ParamUnit::Percent.display_value(0.8), 80.0);
        assert_eq!(ParamUnit::Hertz.display_value(440.0), 440.0);
    }
}
