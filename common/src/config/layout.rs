//! Display and region layout constants.
//!
//! The touch router hit-tests against the same rectangles the renderer
//! fills, so a button is always tappable exactly where it is drawn.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ST7789 1.69" panel, portrait: 240x280)
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels
pub const SCREEN_HEIGHT: u32 = 280;

/// Horizontal margin used by the buttons.
const BUTTON_MARGIN: u32 = 40;

// =============================================================================
// Named Regions
// =============================================================================

/// Mode banner at the top of the screen.
pub const TITLE_REGION: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(SCREEN_WIDTH, 40));

/// Large heart-rate readout (Normal and Demo).
pub const HEART_RATE_REGION: Rectangle = Rectangle::new(Point::new(0, 56), Size::new(SCREEN_WIDTH, 72));

/// Finger / simulated-alert status line (Normal and Demo).
pub const STATUS_REGION: Rectangle = Rectangle::new(Point::new(0, 136), Size::new(SCREEN_WIDTH, 28));

/// Demo toggle button (Normal and Demo).
pub const DEMO_BUTTON: Rectangle = Rectangle::new(
    Point::new((BUTTON_MARGIN + 20) as i32, 196),
    Size::new(SCREEN_WIDTH - 2 * (BUTTON_MARGIN + 20), 52),
);

/// Emergency countdown readout.
pub const COUNTDOWN_REGION: Rectangle = Rectangle::new(Point::new(0, 60), Size::new(SCREEN_WIDTH, 80));

/// Safety confirmation button (Emergency only).
pub const SAFETY_BUTTON: Rectangle = Rectangle::new(
    Point::new(BUTTON_MARGIN as i32, 176),
    Size::new(SCREEN_WIDTH - 2 * BUTTON_MARGIN, 64),
);

const fn fits_on_screen(rect: Rectangle) -> bool {
    rect.top_left.x >= 0
        && rect.top_left.y >= 0
        && rect.top_left.x as u32 + rect.size.width <= SCREEN_WIDTH
        && rect.top_left.y as u32 + rect.size.height <= SCREEN_HEIGHT
}

const _: () = assert!(fits_on_screen(TITLE_REGION));
const _: () = assert!(fits_on_screen(HEART_RATE_REGION));
const _: () = assert!(fits_on_screen(STATUS_REGION));
const _: () = assert!(fits_on_screen(DEMO_BUTTON));
const _: () = assert!(fits_on_screen(COUNTDOWN_REGION));
const _: () = assert!(fits_on_screen(SAFETY_BUTTON));
// Touch coordinates of 0 mean "released", so no button may start on an edge.
const _: () = assert!(DEMO_BUTTON.top_left.x > 0 && DEMO_BUTTON.top_left.y > 0);
const _: () = assert!(SAFETY_BUTTON.top_left.x > 0 && SAFETY_BUTTON.top_left.y > 0);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_button_below_status_line() {
        let status_bottom = STATUS_REGION.top_left.y + STATUS_REGION.size.height as i32;
        assert!(DEMO_BUTTON.top_left.y >= status_bottom);
    }

    #[test]
    fn test_safety_button_below_countdown() {
        let countdown_bottom = COUNTDOWN_REGION.top_left.y + COUNTDOWN_REGION.size.height as i32;
        assert!(SAFETY_BUTTON.top_left.y >= countdown_bottom);
    }

    #[test]
    fn test_buttons_are_centered() {
        for button in [DEMO_BUTTON, SAFETY_BUTTON] {
            let left = button.top_left.x as u32;
            let right = SCREEN_WIDTH - left - button.size.width;
            assert_eq!(left, right);
        }
    }
}
