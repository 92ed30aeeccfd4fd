//! Beat event integration: inter-beat interval to instantaneous BPM.
//!
//! Beat detection itself happens in the PPG collaborator. This integrator
//! only timestamps positive detections, turns the interval into BPM and
//! rejects values outside `(BPM_MIN_EXCLUSIVE, BPM_MAX_EXCLUSIVE)`. Those
//! come from motion artifacts or double-counted peaks and are dropped
//! without an error.

use crate::config::{BPM_MAX_EXCLUSIVE, BPM_MIN_EXCLUSIVE};

const MS_PER_MINUTE: u64 = 60_000;

/// Tracks the time of the previous beat.
#[derive(Debug, Default)]
pub struct BeatIntegrator {
    last_beat_ms: Option<u64>,
}

impl BeatIntegrator {
    pub const fn new() -> Self { Self { last_beat_ms: None } }

    /// Register a detected beat at `now_ms`.
    ///
    /// Returns the instantaneous BPM when it is plausible. The first beat
    /// after construction or [`reset`](Self::reset) only anchors the
    /// interval and always returns `None`.
    pub fn on_beat_detected(
        &mut self,
        now_ms: u64,
    ) -> Option<u8> {
        let previous = self.last_beat_ms.replace(now_ms)?;
        let delta = now_ms.checked_sub(previous).filter(|&d| d > 0)?;
        let bpm = MS_PER_MINUTE / delta;

        if bpm > u64::from(BPM_MIN_EXCLUSIVE) && bpm < u64::from(BPM_MAX_EXCLUSIVE) {
            Some(bpm as u8)
        } else {
            None
        }
    }

    /// Forget the previous beat (finger removed).
    pub fn reset(&mut self) { self.last_beat_ms = None; }

    #[inline]
    pub const fn last_beat_ms(&self) -> Option<u64> { self.last_beat_ms }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_beat_discarded() {
        let mut beats = BeatIntegrator::new();
        assert_eq!(beats.on_beat_detected(0), None);
        assert_eq!(beats.last_beat_ms(), Some(0));
    }

    #[test]
    fn test_600ms_interval_is_100_bpm() {
        let mut beats = BeatIntegrator::new();
        beats.on_beat_detected(0);
        assert_eq!(beats.on_beat_detected(600), Some(100));
    }

    #[test]
    fn test_too_slow_rejected() {
        let mut beats = BeatIntegrator::new();
        beats.on_beat_detected(1_000);
        // 3000ms -> exactly 20 BPM, bound is exclusive
        assert_eq!(beats.on_beat_detected(4_000), None);
        // Anchor still moves forward
        assert_eq!(beats.on_beat_detected(4_500), Some(120));
    }

    #[test]
    fn test_too_fast_rejected() {
        let mut beats = BeatIntegrator::new();
        beats.on_beat_detected(0);
        // 200ms -> 300 BPM (double-counted peak)
        assert_eq!(beats.on_beat_detected(200), None);
        // 235ms -> 255 BPM, bound is exclusive
        assert_eq!(beats.on_beat_detected(435), None);
        // 236ms -> 254 BPM
        assert_eq!(beats.on_beat_detected(671), Some(254));
    }

    #[test]
    fn test_zero_interval_ignored() {
        let mut beats = BeatIntegrator::new();
        beats.on_beat_detected(500);
        assert_eq!(beats.on_beat_detected(500), None);
    }

    #[test]
    fn test_reset_discards_next_beat() {
        let mut beats = BeatIntegrator::new();
        beats.on_beat_detected(0);
        assert_eq!(beats.on_beat_detected(1_000), Some(60));
        beats.reset();
        assert_eq!(beats.on_beat_detected(1_800), None);
        assert_eq!(beats.on_beat_detected(2_600), Some(75));
    }
}
