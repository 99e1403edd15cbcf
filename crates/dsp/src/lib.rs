//! Automatic gain control for 16-bit PCM audio.
//!
//! This crate levels mono sample streams in place: quiet passages are
//! boosted toward a target peak level while loud passages pass through
//! untouched, with a clip guard keeping everything inside 16-bit range.
//! All gain math is Q10 fixed point (1024 is unity); no floating point
//! touches the signal path.
//!
//! # Features
//!
//! - Sustained-peak tracking over a resizable block history
//! - Inertia-smoothed gain with selectable smoothing formula
//! - Session-wide gain floor so pauses cannot trigger runaway boost
//! - Clip guard with in-block gain ramping
//! - Optional per-block clip telemetry for metering
//!
//! One [`Compressor`] instance handles one channel. Feed it buffers of any
//! length; they are processed in [`BLOCK_SAMPLES`]-sized blocks.

pub mod compressor;
pub mod history;

pub use compressor::{Compressor, BLOCK_SAMPLES};
pub use history::PeakHistory;

// Re-export the tuning types so embedders only need this crate
pub use autogain_core::{
    gain_db, gain_factor, CompressorConfig, GainSmoothing, DEFAULT_HISTORY, UNITY_GAIN,
};
