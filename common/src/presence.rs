//! Finger-presence detection against a calibrated IR baseline.
//!
//! The baseline is the mean of `BASELINE_SAMPLES` IR readings taken at
//! startup with nothing on the sensor. After that the monitor only compares:
//! a reading more than `FINGER_DELTA_THRESHOLD` above the baseline means the
//! device is worn. The monitor never touches other components; propagation
//! of a transition (resetting the averager, forcing a publish) is up to the
//! caller.

use crate::config::{BASELINE_SAMPLES, FINGER_DELTA_THRESHOLD};

/// IR intensity with no finger present. Immutable once computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaselineIntensity(u32);

impl BaselineIntensity {
    /// Wrap an already known baseline value.
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Raw IR value.
    #[inline]
    pub const fn value(self) -> u32 { self.0 }
}

/// Accumulates the startup IR samples into a [`BaselineIntensity`].
#[derive(Debug, Default)]
pub struct BaselineCalibrator {
    sum: u64,
    count: usize,
}

impl BaselineCalibrator {
    pub const fn new() -> Self { Self { sum: 0, count: 0 } }

    /// Add one sample. Returns the baseline once enough samples were seen.
    ///
    /// Further calls after completion keep returning the same baseline.
    pub fn push(
        &mut self,
        infrared: u32,
    ) -> Option<BaselineIntensity> {
        if self.count < BASELINE_SAMPLES {
            self.sum += u64::from(infrared);
            self.count += 1;
        }
        self.baseline()
    }

    /// The baseline, if calibration is complete.
    pub fn baseline(&self) -> Option<BaselineIntensity> {
        (self.count >= BASELINE_SAMPLES).then(|| BaselineIntensity((self.sum / self.count as u64) as u32))
    }

    /// Number of samples collected so far.
    #[inline]
    pub const fn collected(&self) -> usize { self.count }
}

/// Result of one presence update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresenceState {
    /// Finger currently on the sensor.
    pub present: bool,
    /// `present` differs from the previous update.
    pub changed: bool,
}

/// Worn / not-worn decision with transition detection.
#[derive(Debug)]
pub struct PresenceMonitor {
    baseline: BaselineIntensity,
    present: bool,
}

impl PresenceMonitor {
    /// Start in the "absent" state.
    pub const fn new(baseline: BaselineIntensity) -> Self {
        Self {
            baseline,
            present: false,
        }
    }

    /// Classify the latest IR reading.
    pub fn update(
        &mut self,
        infrared: u32,
    ) -> PresenceState {
        let delta = i64::from(infrared) - i64::from(self.baseline.value());
        let present = delta > FINGER_DELTA_THRESHOLD;
        let changed = present != self.present;
        self.present = present;
        PresenceState { present, changed }
    }

    /// Result of the last update.
    #[inline]
    pub const fn is_present(&self) -> bool { self.present }

    #[inline]
    pub const fn baseline(&self) -> BaselineIntensity { self.baseline }
}

// =============================================================================
// Unit Tests
// =============================================================================
