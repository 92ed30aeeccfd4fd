//! Color constants for the wristband screen.
//!
//! Rgb565 uses 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue.
//! The ST7789 takes it natively, so no conversion happens on the way out.
//! Standard colors come from the `RgbColor` trait constants.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Screen background and text on bright buttons.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Default text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Emergency background and elevated heart rate.
pub const RED: Rgb565 = Rgb565::RED;

/// Safety button ("I'M OK").
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Demo mode accents.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Custom Colors
// =============================================================================

/// Warning text for a heart rate above `HIGH_BPM_THRESHOLD`.
/// RGB565: (31, 32, 0) - slightly darker than yellow.
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Muted status text ("No finger").
/// RGB565: (16, 32, 16) - roughly 50% brightness.
pub const GRAY: Rgb565 = Rgb565::new(16, 32, 16);

/// Demo button fill.
/// RGB565: (0, 20, 10) - blue-green, darker than full cyan.
pub const DARK_TEAL: Rgb565 = Rgb565::new(0, 20, 10);

/// Emergency screen background. Dark enough for white text to stay readable.
/// RGB565: (16, 0, 0)
pub const DARK_RED: Rgb565 = Rgb565::new(16, 0, 0);
