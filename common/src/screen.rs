//! Screen composition.
//!
//! Turns a [`ScreenView`] snapshot into region-level [`DrawCommand`]s. The
//! display collaborator only sees these commands, never the state machine.
//! A full refresh repaints every region of the current mode after clearing
//! the screen; the periodic refresh repaints only the regions whose text
//! changes while the mode stays put.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;
use heapless::{String, Vec};

use crate::colors::{BLACK, DARK_RED, DARK_TEAL, GRAY, GREEN, ORANGE, RED, WHITE, YELLOW};
use crate::config::{
    COUNTDOWN_REGION,
    DEMO_BUTTON,
    HEART_RATE_REGION,
    HIGH_BPM_THRESHOLD,
    SAFETY_BUTTON,
    STATUS_REGION,
    TITLE_REGION,
};
use crate::mode::DeviceMode;

/// Longest text a region holds.
pub const LABEL_LEN: usize = 24;

/// Most commands a single refresh produces.
pub const MAX_COMMANDS: usize = 4;

/// Region text.
pub type Label = String<LABEL_LEN>;

/// Commands of one refresh.
pub type Frame = Vec<DrawCommand, MAX_COMMANDS>;

/// Named screen areas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenRegion {
    Title,
    HeartRate,
    Status,
    Countdown,
    DemoButton,
    SafetyButton,
}

impl ScreenRegion {
    /// Pixel rectangle. The button rectangles are the touch hit areas too.
    pub const fn area(self) -> Rectangle {
        match self {
            ScreenRegion::Title => TITLE_REGION,
            ScreenRegion::HeartRate => HEART_RATE_REGION,
            ScreenRegion::Status => STATUS_REGION,
            ScreenRegion::Countdown => COUNTDOWN_REGION,
            ScreenRegion::DemoButton => DEMO_BUTTON,
            ScreenRegion::SafetyButton => SAFETY_BUTTON,
        }
    }
}

/// Paint `text` centered in `region` over a `bg` fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub region: ScreenRegion,
    pub text: Label,
    pub fg: Rgb565,
    pub bg: Rgb565,
}

impl DrawCommand {
    pub fn new(
        region: ScreenRegion,
        text: &str,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Self {
        let mut label = Label::new();
        // Truncate rather than drop text that does not fit
        for c in text.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self { region, text: label, fg, bg }
    }

    #[inline]
    pub const fn area(&self) -> Rectangle { self.region.area() }
}

/// What the screen shows, captured once per refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenView {
    pub mode: DeviceMode,
    /// BPM to show: averaged in Normal, synthesized in Demo.
    pub heart_rate: u8,
    pub finger_present: bool,
    pub connected: bool,
    /// Demo script reached its simulated alert.
    pub demo_alert: bool,
    /// Seconds left in Emergency.
    pub countdown_remaining: u32,
}

/// Every region of the current mode. Call after clearing the screen.
pub fn compose_full(view: &ScreenView) -> Frame {
    let mut frame = Frame::new();
    match view.mode {
        DeviceMode::Normal | DeviceMode::Demo => {
            let _ = frame.push(title(view));
            let _ = frame.push(heart_rate(view));
            let _ = frame.push(status(view));
            let _ = frame.push(demo_button(view));
        }
        DeviceMode::Emergency => {
            let _ = frame.push(title(view));
            let _ = frame.push(countdown(view));
            let _ = frame.push(DrawCommand::new(ScreenRegion::SafetyButton, "I'M OK", BLACK, GREEN));
        }
    }
    frame
}

/// Regions that change without a mode transition.
pub fn compose_dynamic(view: &ScreenView) -> Frame {
    let mut frame = Frame::new();
    match view.mode {
        DeviceMode::Normal | DeviceMode::Demo => {
            let _ = frame.push(heart_rate(view));
            let _ = frame.push(status(view));
        }
        DeviceMode::Emergency => {
            let _ = frame.push(countdown(view));
        }
    }
    frame
}

fn title(view: &ScreenView) -> DrawCommand {
    let bg = match view.mode {
        DeviceMode::Normal => BLACK,
        DeviceMode::Demo => DARK_TEAL,
        DeviceMode::Emergency => RED,
    };
    DrawCommand::new(ScreenRegion::Title, view.mode.label(), WHITE, bg)
}

fn heart_rate(view: &ScreenView) -> DrawCommand {
    let known = view.heart_rate > 0 && (view.finger_present || view.mode == DeviceMode::Demo);
    if !known {
        return DrawCommand::new(ScreenRegion::HeartRate, "-- BPM", GRAY, BLACK);
    }

    let fg = if view.heart_rate > HIGH_BPM_THRESHOLD { ORANGE } else { WHITE };
    let mut text = Label::new();
    let _ = write!(text, "{} BPM", view.heart_rate);
    DrawCommand::new(ScreenRegion::HeartRate, &text, fg, BLACK)
}

fn status(view: &ScreenView) -> DrawCommand {
    if view.mode == DeviceMode::Demo {
        return if view.demo_alert {
            DrawCommand::new(ScreenRegion::Status, "SIM ALERT", WHITE, RED)
        } else {
            DrawCommand::new(ScreenRegion::Status, "Simulated data", YELLOW, BLACK)
        };
    }

    let link = if view.connected { "LINK" } else { "----" };
    let mut text = Label::new();
    if view.finger_present {
        let _ = write!(text, "Worn  {link}");
        DrawCommand::new(ScreenRegion::Status, &text, WHITE, BLACK)
    } else {
        let _ = write!(text, "No finger  {link}");
        DrawCommand::new(ScreenRegion::Status, &text, GRAY, BLACK)
    }
}

fn demo_button(view: &ScreenView) -> DrawCommand {
    let text = if view.mode == DeviceMode::Demo { "STOP" } else { "DEMO" };
    DrawCommand::new(ScreenRegion::DemoButton, text, WHITE, DARK_TEAL)
}

fn countdown(view: &ScreenView) -> DrawCommand {
    let mut text = Label::new();
    let _ = write!(text, "SOS {}s", view.countdown_remaining);
    DrawCommand::new(ScreenRegion::Countdown, &text, WHITE, DARK_RED)
}

// =============================================================================
// Unit Tests
// =============================================================================
