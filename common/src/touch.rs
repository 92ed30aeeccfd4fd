//! Touch input routing: debounce, hit-test, dispatch.
//!
//! Turns the raw coordinate stream of the touch controller into discrete
//! taps. A tap needs a fresh contact edge (the panel was released since the
//! last one) and `TOUCH_DEBOUNCE_MS` since the previous recognized tap. The
//! tap is then hit-tested against the regions owned by the current mode.

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};

use crate::config::{DEMO_BUTTON, SAFETY_BUTTON, TOUCH_DEBOUNCE_MS};
use crate::mode::DeviceMode;

/// Named interactive regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegionId {
    DemoButton,
    SafetyButton,
}

/// Mode-transition command attached to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchAction {
    /// Enter or leave the scripted demo.
    ToggleDemo,
    /// Wearer confirms they are safe; cancels the emergency.
    ConfirmSafe,
}

/// A tappable rectangle and what tapping it does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchRegion {
    pub id: RegionId,
    pub area: Rectangle,
    pub action: TouchAction,
}

const DEMO_TOGGLE: TouchRegion = TouchRegion {
    id: RegionId::DemoButton,
    area: DEMO_BUTTON,
    action: TouchAction::ToggleDemo,
};

const SAFETY_CONFIRM: TouchRegion = TouchRegion {
    id: RegionId::SafetyButton,
    area: SAFETY_BUTTON,
    action: TouchAction::ConfirmSafe,
};

const MONITOR_REGIONS: &[TouchRegion] = &[DEMO_TOGGLE];
const EMERGENCY_REGIONS: &[TouchRegion] = &[SAFETY_CONFIRM];

/// Regions that accept taps in `mode`.
pub const fn active_regions(mode: DeviceMode) -> &'static [TouchRegion] {
    match mode {
        DeviceMode::Normal | DeviceMode::Demo => MONITOR_REGIONS,
        DeviceMode::Emergency => EMERGENCY_REGIONS,
    }
}

/// A recognized tap that landed on an active region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapEvent {
    pub x: i32,
    pub y: i32,
    pub region: RegionId,
    pub action: TouchAction,
}

/// Debounce and hit-test state.
#[derive(Debug, Default)]
pub struct TouchRouter {
    touching: bool,
    last_tap_ms: Option<u64>,
}

impl TouchRouter {
    pub const fn new() -> Self {
        Self {
            touching: false,
            last_tap_ms: None,
        }
    }

    /// Feed one raw sample.
    ///
    /// Returns the tapped region's action, or `None` when there was no new
    /// tap or the tap missed every region active in `mode`.
    pub fn poll(
        &mut self,
        raw_x: i32,
        raw_y: i32,
        now_ms: u64,
        mode: DeviceMode,
    ) -> Option<TapEvent> {
        if raw_x <= 0 || raw_y <= 0 {
            self.touching = false;
            return None;
        }

        if self.touching {
            return None;
        }
        // Latch every contact edge so a held finger cannot turn into a late tap
        self.touching = true;

        let debouncing = self
            .last_tap_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < TOUCH_DEBOUNCE_MS);
        if debouncing {
            return None;
        }
        self.last_tap_ms = Some(now_ms);

        let point = Point::new(raw_x, raw_y);
        active_regions(mode)
            .iter()
            .find(|region| region.area.contains(point))
            .map(|region| TapEvent {
                x: raw_x,
                y: raw_y,
                region: region.id,
                action: region.action,
            })
    }

    /// Whether the panel is currently held.
    #[inline]
    pub const fn is_touching(&self) -> bool { self.touching }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn center(area: Rectangle) -> (i32, i32) {
        let c = area.center();
        (c.x, c.y)
    }

    #[test]
    fn test_demo_button_tap_in_normal() {
        let mut router = TouchRouter::new();
        let (x, y) = center(DEMO_BUTTON);
        let tap = router.poll(x, y, 1_000, DeviceMode::Normal).unwrap();
        assert_eq!(tap.region, RegionId::DemoButton);
        assert_eq!(tap.action, TouchAction::ToggleDemo);
    }

    #[test]
    fn test_tap_outside_regions_is_none() {
        let mut router = TouchRouter::new();
        assert!(router.poll(5, 5, 1_000, DeviceMode::Normal).is_none());
    }

    #[test]
    fn test_safety_button_only_in_emergency() {
        let (x, y) = center(SAFETY_BUTTON);
        let mut router = TouchRouter::new();
        let tap = router.poll(x, y, 1_000, DeviceMode::Emergency).unwrap();
        assert_eq!(tap.action, TouchAction::ConfirmSafe);

        // Demo button area is inactive in Emergency
        let mut router = TouchRouter::new();
        let (x, y) = center(DEMO_BUTTON);
        let hit = router.poll(x, y, 1_000, DeviceMode::Emergency);
        assert!(hit.is_none_or(|tap| tap.action != TouchAction::ToggleDemo));
    }

    #[test]
    fn test_held_finger_is_one_tap() {
        let mut router = TouchRouter::new();
        let (x, y) = center(DEMO_BUTTON);
        assert!(router.poll(x, y, 0, DeviceMode::Normal).is_some());
        for t in (10..2_000).step_by(10) {
            assert!(router.poll(x, y, t, DeviceMode::Normal).is_none());
        }
        assert!(router.is_touching());
    }

    #[test]
    fn test_release_clears_latch() {
        let mut router = TouchRouter::new();
        let (x, y) = center(DEMO_BUTTON);
        assert!(router.poll(x, y, 0, DeviceMode::Normal).is_some());
        assert!(router.poll(0, 0, 500, DeviceMode::Normal).is_none());
        assert!(!router.is_touching());
        assert!(router.poll(x, y, 600, DeviceMode::Normal).is_some());
    }

    #[test]
    fn test_debounce_window() {
        let mut router = TouchRouter::new();
        let (x, y) = center(DEMO_BUTTON);
        assert!(router.poll(x, y, 1_000, DeviceMode::Normal).is_some());
        router.poll(-1, -1, 1_050, DeviceMode::Normal);
        // Bounce inside 300ms is swallowed
        assert!(router.poll(x, y, 1_100, DeviceMode::Normal).is_none());
        router.poll(0, 0, 1_150, DeviceMode::Normal);
        assert!(router.poll(x, y, 1_299, DeviceMode::Normal).is_none());
        router.poll(0, 0, 1_300, DeviceMode::Normal);
        assert!(router.poll(x, y, 1_300, DeviceMode::Normal).is_some());
    }

    #[test]
    fn test_missed_tap_still_starts_debounce() {
        let mut router = TouchRouter::new();
        assert!(router.poll(5, 5, 1_000, DeviceMode::Normal).is_none());
        router.poll(0, 0, 1_050, DeviceMode::Normal);
        let (x, y) = center(DEMO_BUTTON);
        assert!(router.poll(x, y, 1_200, DeviceMode::Normal).is_none());
    }

    #[test]
    fn test_zero_coordinate_is_release() {
        let mut router = TouchRouter::new();
        let (x, _) = center(DEMO_BUTTON);
        assert!(router.poll(x, 0, 1_000, DeviceMode::Normal).is_none());
        assert!(!router.is_touching());
    }
}
