//! Runtime-tunable leveler configuration.
//!
//! All defaults are plain named constants so embedders can build their own
//! presets instead of relying on compiled-in literals.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default desired peak level (Q10 scale, about half of full scale).
pub const DEFAULT_TARGET: u32 = 16384;

/// Default ceiling on boost above the session floor (Q10, 32x).
pub const DEFAULT_MAX_GAIN: u32 = 32 << 10;

/// Default smoothing strength.
pub const DEFAULT_SMOOTH: u32 = 8;

/// Default peak-history length in blocks (~4.6 s of mono 44.1 kHz audio
/// at 512-sample blocks).
pub const DEFAULT_HISTORY: usize = 400;

/// Default sample magnitude at or below which a block counts as near-silence.
pub const DEFAULT_SILENCE_THRESHOLD: i32 = 20;

/// Smoothing formula applied between the previous applied gain and the
/// newly computed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GainSmoothing {
    /// Weighted average `(current * (2^smooth - 1) + new) >> smooth`.
    /// Treats `smooth` as a shift exponent; heavier inertia per step.
    Exponential,
    /// Weighted average `(current * smooth + new) / (smooth + 1)`.
    /// Treats `smooth` as a direct weight.
    Linear,
}

impl GainSmoothing {
    pub fn as_str(&self) -> &'static str {
        match self {
            GainSmoothing::Exponential => "exponential",
            GainSmoothing::Linear => "linear",
        }
    }
}

impl Default for GainSmoothing {
    fn default() -> Self {
        GainSmoothing::Exponential
    }
}

/// Error type for invalid smoothing strings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseGainSmoothingError;

impl std::fmt::Display for ParseGainSmoothingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid gain smoothing value")
    }
}

impl std::error::Error for ParseGainSmoothingError {}

impl FromStr for GainSmoothing {
    type Err = ParseGainSmoothingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exponential" => Ok(GainSmoothing::Exponential),
            "linear" => Ok(GainSmoothing::Linear),
            _ => Err(ParseGainSmoothingError),
        }
    }
}

/// Leveler tuning parameters.
///
/// Every field may be changed between `process` calls; values are taken as
/// given and never validated, so stay within the documented ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressorConfig {
    /// Desired peak level in Q10 scale. Must be nonzero; values above
    /// `32767` ask for more output than a 16-bit sample can hold and the
    /// clip guard will fight them.
    pub target: u32,
    /// Maximum boost above the session floor, in Q10 scale.
    pub max_gain: u32,
    /// Smoothing strength. For [`GainSmoothing::Exponential`] this is a
    /// shift exponent and should stay in `0..=16`; for
    /// [`GainSmoothing::Linear`] it is the weight of the previous gain.
    pub smooth: u32,
    /// Which smoothing formula to apply.
    pub smoothing: GainSmoothing,
    /// Accumulate per-block clip magnitudes for metering.
    pub clip_telemetry: bool,
    /// Sustained peaks at or below this raw sample magnitude are treated as
    /// near-silence: the session floor neither initializes nor lowers, and
    /// the gain is capped at `max_gain` directly.
    pub silence_threshold: i32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            max_gain: DEFAULT_MAX_GAIN,
            smooth: DEFAULT_SMOOTH,
            smoothing: GainSmoothing::default(),
            clip_telemetry: true,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
        }
    }
}

impl CompressorConfig {
    /// Create a config with custom level targets, rest defaulted.
    pub fn new(target: u32, max_gain: u32, smooth: u32) -> Self {
        Self {
            target,
            max_gain,
            smooth,
            ..Default::default()
        }
    }
}
