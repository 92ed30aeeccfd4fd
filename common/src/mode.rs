//! Operating mode state machine.
//!
//! ```text
//!            demo tap                    alert command
//!   Normal ───────────▶ Demo ──────────────────────────┐
//!     ▲  ◀─────────────  │                              ▼
//!     │   demo tap /     │ alert command            Emergency
//!     │   20 s elapsed   └─────────────────────────▶    │
//!     └──────────────────────────────────────────────────┘
//!                         safety tap
//! ```
//!
//! The countdown of an emergency never moves the machine by itself. Once it
//! reaches zero the machine stays in Emergency until the wearer confirms.

use crate::config::DEMO_DURATION_MS;
use crate::touch::TouchAction;

/// Exactly one of these is active at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// Live sensor monitoring.
    #[default]
    Normal,
    /// Scripted demo run.
    Demo,
    /// Alert countdown waiting for the wearer.
    Emergency,
}

impl DeviceMode {
    /// Short label for logs and the title bar.
    pub const fn label(self) -> &'static str {
        match self {
            DeviceMode::Normal => "MONITOR",
            DeviceMode::Demo => "DEMO",
            DeviceMode::Emergency => "EMERGENCY",
        }
    }
}

/// Data that only exists while in Emergency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmergencyContext {
    activated_ms: u64,
    countdown_s: u32,
    expiry_reported: bool,
}

impl EmergencyContext {
    pub const fn new(
        activated_ms: u64,
        countdown_s: u32,
    ) -> Self {
        Self {
            activated_ms,
            countdown_s,
            expiry_reported: false,
        }
    }

    #[inline]
    pub const fn activated_ms(&self) -> u64 { self.activated_ms }

    #[inline]
    pub const fn countdown_s(&self) -> u32 { self.countdown_s }

    /// Whole seconds left, floored at zero.
    pub fn remaining_s(
        &self,
        now_ms: u64,
    ) -> u32 {
        let elapsed_s = now_ms.saturating_sub(self.activated_ms) / 1000;
        let elapsed_s = u32::try_from(elapsed_s).unwrap_or(u32::MAX);
        self.countdown_s.saturating_sub(elapsed_s)
    }

    /// Whether the countdown has run out.
    pub fn expired(
        &self,
        now_ms: u64,
    ) -> bool {
        self.remaining_s(now_ms) == 0
    }
}

/// Internal state, including per-mode data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeState {
    Normal,
    Demo {
        started_ms: u64,
        /// The synthesizer reached its simulated alert.
        alert_pending: bool,
    },
    Emergency(EmergencyContext),
}

impl ModeState {
    pub const fn mode(&self) -> DeviceMode {
        match self {
            ModeState::Normal => DeviceMode::Normal,
            ModeState::Demo { .. } => DeviceMode::Demo,
            ModeState::Emergency(_) => DeviceMode::Emergency,
        }
    }
}

/// What caused a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionCause {
    DemoToggle,
    DemoElapsed,
    AlertCommand,
    SafetyConfirmed,
}

/// A mode change that happened this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: DeviceMode,
    pub to: DeviceMode,
    pub cause: TransitionCause,
}

/// Owner of the current mode.
#[derive(Debug)]
pub struct ModeMachine {
    state: ModeState,
}

impl Default for ModeMachine {
    fn default() -> Self { Self::new() }
}

impl ModeMachine {
    /// Start in Normal.
    pub const fn new() -> Self {
        Self {
            state: ModeState::Normal,
        }
    }

    #[inline]
    pub const fn mode(&self) -> DeviceMode { self.state.mode() }

    #[inline]
    pub const fn state(&self) -> &ModeState { &self.state }

    /// Emergency data, if in Emergency.
    pub const fn emergency(&self) -> Option<&EmergencyContext> {
        match &self.state {
            ModeState::Emergency(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Demo start time, if in Demo.
    pub const fn demo_started_ms(&self) -> Option<u64> {
        match self.state {
            ModeState::Demo { started_ms, .. } => Some(started_ms),
            _ => None,
        }
    }

    /// Simulated alert raised during the current demo run.
    pub const fn demo_alert_pending(&self) -> bool {
        matches!(self.state, ModeState::Demo { alert_pending: true, .. })
    }

    /// Dispatch a touch action.
    pub fn apply_touch(
        &mut self,
        action: TouchAction,
        now_ms: u64,
    ) -> Option<Transition> {
        match action {
            TouchAction::ToggleDemo => self.toggle_demo(now_ms),
            TouchAction::ConfirmSafe => self.confirm_safe(),
        }
    }

    /// Normal -> Demo or Demo -> Normal. Ignored in Emergency.
    pub fn toggle_demo(
        &mut self,
        now_ms: u64,
    ) -> Option<Transition> {
        let next = match self.state {
            ModeState::Normal => ModeState::Demo {
                started_ms: now_ms,
                alert_pending: false,
            },
            ModeState::Demo { .. } => ModeState::Normal,
            ModeState::Emergency(_) => return None,
        };
        Some(self.enter(next, TransitionCause::DemoToggle))
    }

    /// Leave Demo once the run has lasted `DEMO_DURATION_MS`.
    pub fn expire_demo(
        &mut self,
        now_ms: u64,
    ) -> Option<Transition> {
        let started_ms = self.demo_started_ms()?;
        if now_ms.saturating_sub(started_ms) < DEMO_DURATION_MS {
            return None;
        }
        Some(self.enter(ModeState::Normal, TransitionCause::DemoElapsed))
    }

    /// Enter Emergency from Normal or Demo.
    ///
    /// A repeated command while already in Emergency keeps the original
    /// activation time and countdown.
    pub fn raise_emergency(
        &mut self,
        now_ms: u64,
        countdown_s: u32,
    ) -> Option<Transition> {
        if self.mode() == DeviceMode::Emergency {
            return None;
        }
        let ctx = EmergencyContext::new(now_ms, countdown_s);
        Some(self.enter(ModeState::Emergency(ctx), TransitionCause::AlertCommand))
    }

    /// Emergency -> Normal.
    pub fn confirm_safe(&mut self) -> Option<Transition> {
        if self.mode() != DeviceMode::Emergency {
            return None;
        }
        Some(self.enter(ModeState::Normal, TransitionCause::SafetyConfirmed))
    }

    /// Record the synthesizer's trigger flag. No-op outside Demo.
    pub fn flag_demo_alert(&mut self) {
        if let ModeState::Demo { alert_pending, .. } = &mut self.state {
            *alert_pending = true;
        }
    }

    /// True exactly once per emergency, on the first call after the
    /// countdown ran out.
    pub fn take_countdown_expiry(
        &mut self,
        now_ms: u64,
    ) -> bool {
        match &mut self.state {
            ModeState::Emergency(ctx) if !ctx.expiry_reported && ctx.expired(now_ms) => {
                ctx.expiry_reported = true;
                true
            }
            _ => false,
        }
    }

    fn enter(
        &mut self,
        next: ModeState,
        cause: TransitionCause,
    ) -> Transition {
        let from = self.mode();
        self.state = next;
        Transition {
            from,
            to: self.mode(),
            cause,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_normal() {
        let machine = ModeMachine::new();
        assert_eq!(machine.mode(), DeviceMode::Normal);
        assert!(machine.emergency().is_none());
    }

    #[test]
    fn test_demo_toggle_round_trip() {
        let mut machine = ModeMachine::new();
        let t = machine.toggle_demo(500).unwrap();
        assert_eq!((t.from, t.to), (DeviceMode::Normal, DeviceMode::Demo));
        assert_eq!(machine.demo_started_ms(), Some(500));

        let t = machine.toggle_demo(900).unwrap();
        assert_eq!((t.from, t.to), (DeviceMode::Demo, DeviceMode::Normal));
        assert_eq!(t.cause, TransitionCause::DemoToggle);
    }

    #[test]
    fn test_demo_expires_exactly_at_duration() {
        let mut machine = ModeMachine::new();
        machine.toggle_demo(1_000);
        machine.flag_demo_alert();
        assert!(machine.demo_alert_pending());

        assert!(machine.expire_demo(1_000 + DEMO_DURATION_MS - 1).is_none());
        assert_eq!(machine.mode(), DeviceMode::Demo);

        let t = machine.expire_demo(1_000 + DEMO_DURATION_MS).unwrap();
        assert_eq!(t.cause, TransitionCause::DemoElapsed);
        assert_eq!(machine.mode(), DeviceMode::Normal);
        assert!(!machine.demo_alert_pending());
    }

    #[test]
    fn test_toggle_clears_demo_alert() {
        let mut machine = ModeMachine::new();
        machine.toggle_demo(0);
        machine.flag_demo_alert();
        machine.toggle_demo(100);
        machine.toggle_demo(200);
        assert!(!machine.demo_alert_pending());
    }

    #[test]
    fn test_flag_ignored_outside_demo() {
        let mut machine = ModeMachine::new();
        machine.flag_demo_alert();
        assert_eq!(*machine.state(), ModeState::Normal);
    }

    #[test]
    fn test_emergency_from_normal_and_demo() {
        let mut machine = ModeMachine::new();
        let t = machine.raise_emergency(1_000, 10).unwrap();
        assert_eq!(t.to, DeviceMode::Emergency);
        assert_eq!(t.cause, TransitionCause::AlertCommand);

        let mut machine = ModeMachine::new();
        machine.toggle_demo(0);
        let t = machine.raise_emergency(1_000, 10).unwrap();
        assert_eq!((t.from, t.to), (DeviceMode::Demo, DeviceMode::Emergency));
    }

    #[test]
    fn test_repeated_alert_is_idempotent() {
        let mut machine = ModeMachine::new();
        machine.raise_emergency(1_000, 10);
        assert!(machine.raise_emergency(3_000, 30).is_none());
        let ctx = machine.emergency().unwrap();
        assert_eq!(ctx.activated_ms(), 1_000);
        assert_eq!(ctx.countdown_s(), 10);
    }

    #[test]
    fn test_demo_toggle_ignored_in_emergency() {
        let mut machine = ModeMachine::new();
        machine.raise_emergency(0, 5);
        assert!(machine.toggle_demo(100).is_none());
        assert!(machine.expire_demo(DEMO_DURATION_MS * 2).is_none());
        assert_eq!(machine.mode(), DeviceMode::Emergency);
    }

    #[test]
    fn test_confirm_safe() {
        let mut machine = ModeMachine::new();
        assert!(machine.confirm_safe().is_none());
        machine.raise_emergency(1_000, 10);
        let t = machine.apply_touch(TouchAction::ConfirmSafe, 3_000).unwrap();
        assert_eq!(t.cause, TransitionCause::SafetyConfirmed);
        assert_eq!(machine.mode(), DeviceMode::Normal);
        assert!(machine.emergency().is_none());
    }

    #[test]
    fn test_countdown_remaining() {
        let ctx = EmergencyContext::new(1_000, 10);
        assert_eq!(ctx.remaining_s(1_000), 10);
        assert_eq!(ctx.remaining_s(3_999), 8);
        assert_eq!(ctx.remaining_s(11_000), 0);
        assert_eq!(ctx.remaining_s(500_000), 0);
        assert!(ctx.expired(11_000));
    }

    #[test]
    fn test_countdown_expiry_reported_once_and_mode_kept() {
        let mut machine = ModeMachine::new();
        machine.raise_emergency(0, 2);
        assert!(!machine.take_countdown_expiry(1_999));
        assert!(machine.take_countdown_expiry(2_000));
        assert!(!machine.take_countdown_expiry(2_500));
        assert_eq!(machine.mode(), DeviceMode::Emergency);
    }

    #[test]
    fn test_zero_countdown_expires_immediately() {
        let mut machine = ModeMachine::new();
        machine.raise_emergency(100, 0);
        assert!(machine.take_countdown_expiry(100));
    }
}
