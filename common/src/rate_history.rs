//! Rolling BPM average over the last few accepted beats.
//!
//! A fixed ring of `RATE_HISTORY_CAPACITY` byte-sized slots. The average is
//! recomputed on every mutation and always divides by the full capacity, so
//! it reads low until the ring has been filled once. That bias is kept on
//! purpose: it is what the wearer sees on the device today.

use crate::config::RATE_HISTORY_CAPACITY;

/// Ring of recent instantaneous BPM values and their mean.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateHistory {
    slots: [u8; RATE_HISTORY_CAPACITY],
    cursor: usize,
    average: u8,
}

impl RateHistory {
    /// Create an empty (all-zero) history.
    pub const fn new() -> Self {
        Self {
            slots: [0; RATE_HISTORY_CAPACITY],
            cursor: 0,
            average: 0,
        }
    }

    /// Store a BPM value at the cursor, overwriting the oldest slot.
    pub fn record(
        &mut self,
        bpm: u8,
    ) {
        self.slots[self.cursor] = bpm;
        self.cursor = (self.cursor + 1) % RATE_HISTORY_CAPACITY;
        self.average = Self::mean(&self.slots);
    }

    /// Zero every slot and the cursor.
    pub fn reset(&mut self) {
        self.slots = [0; RATE_HISTORY_CAPACITY];
        self.cursor = 0;
        self.average = 0;
    }

    /// Averaged BPM (integer mean over all slots).
    #[inline]
    pub const fn current_average(&self) -> u8 { self.average }

    /// Raw slot contents in storage order.
    #[inline]
    pub const fn slots(&self) -> &[u8; RATE_HISTORY_CAPACITY] { &self.slots }

    fn mean(slots: &[u8; RATE_HISTORY_CAPACITY]) -> u8 {
        let sum: u32 = slots.iter().map(|&v| u32::from(v)).sum();
        (sum / RATE_HISTORY_CAPACITY as u32) as u8
    }
}

impl Default for RateHistory {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_new_history_is_zero() {
        let history = RateHistory::new();
        assert_eq!(history.current_average(), 0);
        assert!(history.slots().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_partial_fill_biases_low() {
        let mut history = RateHistory::new();
        history.record(100);
        // One real beat and three empty slots
        assert_eq!(history.current_average(), 25);
        history.record(100);
        assert_eq!(history.current_average(), 50);
    }

    #[test]
    fn test_full_ring_average() {
        let mut history = RateHistory::new();
        for bpm in [60, 70, 80, 90] {
            history.record(bpm);
        }
        assert_eq!(history.current_average(), 75);
    }

    #[test]
    fn test_oldest_slot_overwritten() {
        let mut history = RateHistory::new();
        for bpm in [60, 70, 80, 90, 200] {
            history.record(bpm);
        }
        // 60 was replaced by 200
        assert_eq!(history.slots(), &[200, 70, 80, 90]);
        assert_eq!(history.current_average(), 110);
    }

    #[test]
    fn test_integer_mean_truncates() {
        let mut history = RateHistory::new();
        for bpm in [61, 61, 61, 62] {
            history.record(bpm);
        }
        assert_eq!(history.current_average(), 61);
    }

    #[test]
    fn test_reset_clears_slots_and_cursor() {
        let mut history = RateHistory::new();
        for bpm in [90, 91, 92] {
            history.record(bpm);
        }
        history.reset();
        assert_eq!(history, RateHistory::new());

        history.record(80);
        assert_eq!(history.slots(), &[80, 0, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_average_is_mean_of_last_four(values in prop::collection::vec(21u8..255, 4..64)) {
            let mut history = RateHistory::new();
            for &v in &values {
                history.record(v);
            }
            let tail = &values[values.len() - RATE_HISTORY_CAPACITY..];
            let expected = tail.iter().map(|&v| u32::from(v)).sum::<u32>() / RATE_HISTORY_CAPACITY as u32;
            prop_assert_eq!(u32::from(history.current_average()), expected);
        }
    }
}
