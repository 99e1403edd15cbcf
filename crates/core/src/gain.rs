//! Q10 fixed-point gain representation.
//!
//! Gains are unsigned integers scaled by 1024: 1024 is unity, 2048 doubles
//! the signal, 512 would halve it. Amplification is `(sample * gain) >> 10`
//! with a widened intermediate so nothing overflows before the final clamp.

/// Unity gain in Q10 fixed point (signal passes through unchanged).
pub const UNITY_GAIN: u32 = 1 << 10;

/// Convert a Q10 gain to a linear multiplier, for display and metering.
pub fn gain_factor(gain: u32) -> f64 {
    f64::from(gain) / f64::from(UNITY_GAIN)
}

/// Convert a Q10 gain to decibels, for display and metering.
///
/// A gain of zero has no dB representation and yields negative infinity.
pub fn gain_db(gain: u32) -> f64 {
    20.0 * gain_factor(gain).log10()
}
