//! Peak-history ring buffer.
//!
//! The leveler reacts to the loudest peak observed over the last N blocks
//! rather than the instantaneous block peak, so a short quiet stretch inside
//! loud material does not cause gain pumping. The ring holds one peak per
//! processed block and can be resized mid-session without losing chronology.

/// Fixed-capacity ring of recent block peaks.
///
/// Slots hold raw sample magnitudes, floored at 1 once written. Unwritten
/// slots hold 0 and never win the sustained maximum. The head is the next
/// write position; capacity never drops below one slot.
#[derive(Clone, Debug)]
pub struct PeakHistory {
    peaks: Vec<i32>,
    head: usize,
}

impl PeakHistory {
    /// Create a ring with the given capacity (floored at one slot).
    pub fn new(capacity: usize) -> Self {
        Self {
            peaks: vec![0; capacity.max(1)],
            head: 0,
        }
    }

    /// Number of slots in the ring.
    pub fn capacity(&self) -> usize {
        self.peaks.len()
    }

    /// Record a block peak, overwriting the oldest entry. Returns the slot
    /// index written so callers can align per-slot bookkeeping.
    pub fn push(&mut self, peak: i32) -> usize {
        let slot = self.head;
        self.peaks[slot] = peak.max(1);
        self.head = (slot + 1) % self.peaks.len();
        slot
    }

    /// Slot written by the most recent `push`.
    pub fn last_slot(&self) -> usize {
        (self.head + self.peaks.len() - 1) % self.peaks.len()
    }

    /// Loudest peak across every retained block, floored at 1.
    pub fn sustained_peak(&self) -> i32 {
        self.peaks.iter().copied().max().unwrap_or(1).max(1)
    }

    /// Ring contents ordered from the next slot to be overwritten to the
    /// most recently written. For a full ring this is oldest to newest;
    /// slots not yet written read 0.
    pub fn peaks(&self) -> Vec<i32> {
        let cap = self.peaks.len();
        (0..cap).map(|i| self.peaks[(self.head + i) % cap]).collect()
    }

    /// Change the capacity, keeping the `min(old, new)` most recent peaks
    /// in chronological order. Growing zero-fills the new slots. Afterwards
    /// the head points at the slot whose overwrite keeps chronology intact.
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        let old_cap = self.peaks.len();
        let keep = capacity.min(old_cap);
        let mut peaks = vec![0; capacity];

        // The retained run may wrap the old ring: copy the segment from the
        // oldest retained index to the end, then the segment from the start.
        let start = (self.head + old_cap - keep) % old_cap;
        let tail = (old_cap - start).min(keep);
        peaks[..tail].copy_from_slice(&self.peaks[start..start + tail]);
        peaks[tail..keep].copy_from_slice(&self.peaks[..keep - tail]);

        self.head = if keep == capacity { 0 } else { keep };
        self.peaks = peaks;
    }

    /// Forget every retained peak and rewind the head.
    pub fn reset(&mut self) {
        self.peaks.fill(0);
        self.head = 0;
    }
}
