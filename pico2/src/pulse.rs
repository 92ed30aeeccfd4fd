//! Beat detection on the raw IR stream.
//!
//! The IR signal is a large DC level (tissue, ambient) with a small pulsatile
//! component riding on it. The detector removes the DC with a slow running
//! average, smooths the remainder with a fast one, and reports a beat on each
//! rising zero crossing whose preceding swing was pulse-sized. Swings that
//! are too small are noise; swings that are too large are the finger moving.

/// DC tracker weight, as a power of two (1/32).
const DC_SHIFT: u32 = 5;
/// Fixed-point fraction bits of the DC estimate.
const DC_FRAC_BITS: u32 = 8;
/// Smoothing weight, as a power of two (1/4).
const SMOOTH_SHIFT: u32 = 2;

/// Smallest peak-to-peak swing accepted as a pulse.
pub const MIN_SWING: i32 = 20;
/// Largest peak-to-peak swing accepted as a pulse.
pub const MAX_SWING: i32 = 2_000;

/// Zero-crossing beat detector.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PulseDetector {
    /// DC estimate in `DC_FRAC_BITS` fixed point. `None` until the first sample.
    dc: Option<i64>,
    smoothed: i32,
    cycle_max: i32,
    cycle_min: i32,
}

impl PulseDetector {
    pub const fn new() -> Self {
        Self {
            dc: None,
            smoothed: 0,
            cycle_max: 0,
            cycle_min: 0,
        }
    }

    /// Feed one IR sample. Returns `true` when it completes a beat.
    pub fn feed(
        &mut self,
        infrared: u32,
    ) -> bool {
        let scaled = i64::from(infrared) << DC_FRAC_BITS;
        let dc = match self.dc {
            Some(dc) => dc + ((scaled - dc) >> DC_SHIFT),
            None => scaled,
        };
        self.dc = Some(dc);

        let ac = (i64::from(infrared) - (dc >> DC_FRAC_BITS)) as i32;
        let previous = self.smoothed;
        self.smoothed += (ac - self.smoothed) >> SMOOTH_SHIFT;
        let current = self.smoothed;

        let mut beat = false;
        if previous < 0 && current >= 0 {
            let swing = self.cycle_max - self.cycle_min;
            beat = swing > MIN_SWING && swing < MAX_SWING;
            self.cycle_max = 0;
        } else if previous > 0 && current <= 0 {
            self.cycle_min = 0;
        }

        self.cycle_max = self.cycle_max.max(current);
        self.cycle_min = self.cycle_min.min(current);
        beat
    }

    /// Forget the signal history (finger removed, sensor re-seated).
    pub fn reset(&mut self) { *self = Self::new(); }
}

// =============================================================================
// Unit Tests
// =============================================================================
