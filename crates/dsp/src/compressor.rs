//! Sustained-peak automatic leveler for 16-bit PCM.

use autogain_core::{CompressorConfig, GainSmoothing, DEFAULT_HISTORY, UNITY_GAIN};
use tracing::{debug, trace};

use crate::history::PeakHistory;

/// Samples per processing block. Caller buffers of any length are split at
/// this granularity (last block partial); each block takes one history slot
/// and one gain ramp, so the gain can finish reacting inside a large buffer.
pub const BLOCK_SAMPLES: usize = 512;

/// Automatic gain control driven by sustained peaks.
///
/// Tracks the loudest peak across the recent block history and steers a Q10
/// gain toward `target / sustained_peak`, smoothed against the previous
/// value and ramped linearly inside each block. A session-wide floor keeps
/// silent pauses from triggering runaway boost, and a clip guard recomputes
/// the gain whenever the sustained peak would leave 16-bit range.
///
/// One instance handles one channel; interleaved stereo needs two instances
/// fed with de-interleaved buffers.
pub struct Compressor {
    config: CompressorConfig,
    history: PeakHistory,
    /// Clip magnitude accumulated per history slot, for metering.
    clipped: Vec<u64>,
    /// Gain applied at the end of the previous block (Q10, never below unity).
    gain: u32,
    /// Session floor for the pre-smoothing gain. Unset until the first block
    /// louder than the silence threshold; only ever lowered afterwards.
    min_gain: Option<u32>,
}

impl Compressor {
    /// Create a leveler with default tuning. A `history` of 0 selects
    /// [`DEFAULT_HISTORY`].
    pub fn new(history: usize) -> Self {
        Self::with_config(history, CompressorConfig::default())
    }

    /// Create a leveler with explicit tuning.
    pub fn with_config(history: usize, config: CompressorConfig) -> Self {
        let history = if history == 0 { DEFAULT_HISTORY } else { history };
        debug!(
            "leveler created: history={} target={} max_gain={} smooth={} ({})",
            history,
            config.target,
            config.max_gain,
            config.smooth,
            config.smoothing.as_str()
        );
        Self {
            config,
            history: PeakHistory::new(history),
            clipped: vec![0; history],
            gain: UNITY_GAIN,
            min_gain: None,
        }
    }

    /// Current tuning parameters.
    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Mutable tuning parameters; changes take effect on the next block.
    pub fn config_mut(&mut self) -> &mut CompressorConfig {
        &mut self.config
    }

    /// Gain committed by the most recent block (Q10).
    pub fn gain(&self) -> u32 {
        self.gain
    }

    /// Session floor for the pre-smoothing gain, once established.
    pub fn min_gain(&self) -> Option<u32> {
        self.min_gain
    }

    /// Read-only view of the peak history.
    pub fn history(&self) -> &PeakHistory {
        &self.history
    }

    /// Clip magnitude accumulated while processing the most recent block.
    pub fn last_clipped(&self) -> u64 {
        self.clipped[self.history.last_slot()]
    }

    /// Whether any retained block clipped.
    pub fn has_clipped(&self) -> bool {
        self.clipped.iter().any(|&clip| clip > 0)
    }

    /// Resize the peak history, keeping the most recent peaks in order.
    /// A `history` of 0 selects [`DEFAULT_HISTORY`].
    ///
    /// The session floor unsets, clip counters clear, and smoothing restarts
    /// from unity; the retained peaks keep steering the gain.
    pub fn set_history(&mut self, history: usize) {
        let history = if history == 0 { DEFAULT_HISTORY } else { history };
        let old = self.history.capacity();
        self.history.resize(history);
        self.clipped = vec![0; history];
        self.gain = UNITY_GAIN;
        self.min_gain = None;
        debug!("peak history resized: {} -> {} slots", old, history);
    }

    /// Return every piece of state to the freshly constructed values.
    pub fn reset(&mut self) {
        self.history.reset();
        self.clipped.fill(0);
        self.gain = UNITY_GAIN;
        self.min_gain = None;
    }

    /// Level a buffer of mono samples in place.
    ///
    /// The buffer is split into [`BLOCK_SAMPLES`]-sized blocks, the last one
    /// partial. An empty buffer leaves all state untouched.
    pub fn process(&mut self, samples: &mut [i16]) {
        if samples.is_empty() {
            return;
        }
        for block in samples.chunks_mut(BLOCK_SAMPLES) {
            self.process_block(block);
        }
    }

    fn process_block(&mut self, block: &mut [i16]) {
        let config = self.config;

        // Loudest magnitude in this block and where it sits. The floor of 1
        // keeps the gain division defined on silent input.
        let mut peak: i32 = 1;
        let mut peak_pos: usize = 0;
        for (i, &sample) in block.iter().enumerate() {
            let magnitude = i32::from(sample).abs();
            if magnitude > peak {
                peak = magnitude;
                peak_pos = i;
            }
        }

        let slot = self.history.push(peak);
        let sustained = self.history.sustained_peak();
        if sustained > peak {
            // The driving peak lives in an earlier block, so a clip-guard
            // ramp has no position to finish at inside this one.
            peak_pos = 0;
        }

        let raw = (u64::from(config.target) << 10) / sustained as u64;
        let mut new_gain = raw.min(u64::from(u32::MAX)) as u32;

        if sustained <= config.silence_threshold {
            // Near-silence must not teach the floor anything; cap the boost
            // directly and leave the floor alone.
            new_gain = new_gain.min(config.max_gain);
        } else {
            let floor = self.min_gain.map_or(new_gain, |floor| floor.min(new_gain));
            self.min_gain = Some(floor);
            new_gain = new_gain.min(floor.saturating_add(config.max_gain));
        }

        let prev_gain = self.gain;
        let smoothed = match config.smoothing {
            GainSmoothing::Exponential => {
                let weight = (1u64 << config.smooth) - 1;
                (u64::from(prev_gain) * weight + u64::from(new_gain)) >> config.smooth
            }
            GainSmoothing::Linear => {
                let weight = u64::from(config.smooth);
                (u64::from(prev_gain) * weight + u64::from(new_gain)) / (weight + 1)
            }
        };
        new_gain = smoothed.min(u64::from(u32::MAX)) as u32;

        // Boost only: unity is the floor, attenuation never happens.
        new_gain = new_gain.max(UNITY_GAIN);

        let mut ramp = block.len();
        let amplified_peak = (i64::from(sustained) * i64::from(new_gain)) >> 10;
        if amplified_peak > i64::from(i16::MAX) {
            // The sustained peak would clip at this gain. Recompute the gain
            // that puts it exactly at full scale and finish the ramp before
            // the in-block peak. A full-scale negative peak (magnitude
            // 32768) passes at unity.
            let guard = (i64::from(i16::MAX) << 10) / i64::from(sustained);
            new_gain = (guard as u32).max(UNITY_GAIN);
            ramp = peak_pos;
        }

        trace!(
            "block: peak={} sustained={} gain {} -> {} ramp={}",
            peak,
            sustained,
            prev_gain,
            new_gain,
            ramp
        );
        self.gain = new_gain;

        // Truncating division: a falling ramp stays at or above its target
        // until the hold, and the per-sample clamp covers the overshoot.
        let ramp = ramp.max(1);
        let delta = (i64::from(new_gain) - i64::from(prev_gain)) / ramp as i64;
        let mut gain = i64::from(prev_gain);
        let mut clip_amount: u64 = 0;

        for (i, sample) in block.iter_mut().enumerate() {
            let amplified = (i64::from(*sample) * gain) >> 10;
            let bounded = amplified.clamp(i64::from(i16::MIN), i64::from(i16::MAX));
            if config.clip_telemetry && bounded != amplified {
                clip_amount += amplified.abs_diff(bounded);
            }
            *sample = bounded as i16;

            if i < ramp {
                gain += delta;
            } else {
                gain = i64::from(new_gain);
            }
        }

        self.clipped[slot] = clip_amount;
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(0)
    }
}
