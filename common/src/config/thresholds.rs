//! Detection thresholds, cadences and demo parameters.
//!
//! All values are compile-time constants with validation assertions, in the
//! same spirit as the display layout: a misconfigured threshold fails the
//! build instead of misbehaving on the wrist.

// =============================================================================
// Finger Presence
// =============================================================================

/// IR intensity above the calibrated baseline that counts as a finger on
/// the sensor. Fixed, not adaptive.
pub const FINGER_DELTA_THRESHOLD: i64 = 50_000;

/// Number of consecutive IR samples averaged into the startup baseline.
pub const BASELINE_SAMPLES: usize = 32;

const _: () = assert!(FINGER_DELTA_THRESHOLD > 0);
const _: () = assert!(BASELINE_SAMPLES > 0);

// =============================================================================
// Heart Rate
// =============================================================================

/// Instantaneous BPM must be strictly above this to be recorded.
pub const BPM_MIN_EXCLUSIVE: u32 = 20;

/// Instantaneous BPM must be strictly below this to be recorded.
/// Anything accepted therefore fits in a byte.
pub const BPM_MAX_EXCLUSIVE: u32 = 255;

/// Number of slots in the rolling BPM average.
pub const RATE_HISTORY_CAPACITY: usize = 4;

/// Heart rate drawn in the warning color at or above this value.
pub const HIGH_BPM_THRESHOLD: u8 = 100;

const _: () = assert!(BPM_MIN_EXCLUSIVE < BPM_MAX_EXCLUSIVE);
const _: () = assert!(BPM_MAX_EXCLUSIVE <= u8::MAX as u32 + 1);
const _: () = assert!(RATE_HISTORY_CAPACITY > 0);

// =============================================================================
// Cadences (milliseconds)
// =============================================================================

/// Minimum gap between two periodic telemetry frames (strictly greater).
pub const TELEMETRY_PERIOD_MS: u64 = 500;

/// Gap between two refreshes of the dynamic screen regions.
pub const DISPLAY_REFRESH_MS: u64 = 500;

/// Minimum time between two recognized taps.
pub const TOUCH_DEBOUNCE_MS: u64 = 300;

/// Length of one scripted demo run.
pub const DEMO_DURATION_MS: u64 = 20_000;

const _: () = assert!(TOUCH_DEBOUNCE_MS < DEMO_DURATION_MS);

// =============================================================================
// Demo Synthesizer
// =============================================================================

/// BPM at the start of the demo ramp.
pub const DEMO_BPM_START: f32 = 70.0;

/// BPM at the end of the ramp and the plateau level after it.
pub const DEMO_BPM_PEAK: f32 = 130.0;

/// Maximum absolute BPM jitter on the plateau.
pub const DEMO_BPM_JITTER: i32 = 3;

/// Fraction of the run spent ramping; the emergency trigger rises after it.
pub const DEMO_RAMP_END: f32 = 0.2;

/// End of the violent-motion window (starts at `DEMO_RAMP_END`).
pub const DEMO_VIOLENT_END: f32 = 0.6;

/// Motion amplitude multiplier inside the violent-motion window.
pub const DEMO_VIOLENT_GAIN: f32 = 4.0;

const _: () = assert!(DEMO_BPM_START < DEMO_BPM_PEAK);
const _: () = assert!(DEMO_RAMP_END < DEMO_VIOLENT_END && DEMO_VIOLENT_END < 1.0);
const _: () = assert!((DEMO_BPM_PEAK as i32 + DEMO_BPM_JITTER) < BPM_MAX_EXCLUSIVE as i32);

// =============================================================================
// Unit Tests
// =============================================================================
