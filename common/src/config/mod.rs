//! Compile-time configuration.
//!
//! - `layout`: Display dimensions and the named screen/touch regions
//! - `thresholds`: Detection thresholds, cadences and demo parameters

pub mod layout;
pub mod thresholds;

// Re-export layout constants at config level for convenience
pub use layout::{
    COUNTDOWN_REGION,
    DEMO_BUTTON,
    HEART_RATE_REGION,
    SAFETY_BUTTON,
    SCREEN_HEIGHT,
    SCREEN_WIDTH,
    STATUS_REGION,
    TITLE_REGION,
};
// Re-export thresholds at config level for convenience
pub use thresholds::{
    BASELINE_SAMPLES,
    BPM_MAX_EXCLUSIVE,
    BPM_MIN_EXCLUSIVE,
    DEMO_DURATION_MS,
    DISPLAY_REFRESH_MS,
    FINGER_DELTA_THRESHOLD,
    HIGH_BPM_THRESHOLD,
    RATE_HISTORY_CAPACITY,
    TELEMETRY_PERIOD_MS,
    TOUCH_DEBOUNCE_MS,
};

/// Size of the buffer a telemetry frame is encoded into.
pub const TELEMETRY_PAYLOAD_LEN: usize = 256;

/// Maximum length of one inbound link payload (one command line).
pub const LINK_PAYLOAD_LEN: usize = 96;
