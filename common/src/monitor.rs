//! The per-cycle orchestrator.
//!
//! [`Monitor`] owns every piece of mutable state and advances it once per
//! call to [`Monitor::tick`]. The caller's scheduler decides the cadence;
//! the monitor only looks at the timestamp it is handed.
//!
//! # Order inside one tick
//!
//! 1. Drain link events (connection state, alert commands into the slot)
//! 2. Consume the alert slot (may enter Emergency)
//! 3. PPG path: presence, beat interval, rolling average
//! 4. Inertial read, if a sensor is attached and has data
//! 5. Touch routing
//! 6. Demo expiry and synthesis
//! 7. Transition side effects (cancel acknowledgement, forced publish)
//! 8. Telemetry
//! 9. Display refresh
//!
//! Only the first transition of a tick is taken. A tap or demo expiry that
//! loses against an earlier transition is dropped; expiry simply fires again
//! on the next tick.

use crate::beat::BeatIntegrator;
use crate::config::{DEMO_DURATION_MS, DISPLAY_REFRESH_MS};
use crate::demo::{DemoSample, DemoSynthesizer};
use crate::error::CommandError;
use crate::link::{AlertCommand, AlertSlot, LinkEvent, parse_command};
use crate::mode::{DeviceMode, ModeMachine, Transition, TransitionCause};
use crate::ports::{
    DisplaySink,
    InertialReading,
    InertialSensor,
    Io,
    NotificationChannel,
    PpgSensor,
    TouchPanel,
};
use crate::presence::{BaselineIntensity, PresenceMonitor, PresenceState};
use crate::rate_history::RateHistory;
use crate::screen::{ScreenView, compose_dynamic, compose_full};
use crate::telemetry::{PublishOutcome, TelemetryFrame, TelemetryPublisher};
use crate::touch::{TapEvent, TouchRouter};

/// What the display did this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayRefresh {
    #[default]
    None,
    /// Dynamic regions only.
    Partial,
    /// Cleared and repainted.
    Full,
}

/// Summary of one tick, for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Mode after the tick.
    pub mode: DeviceMode,
    pub transition: Option<Transition>,
    pub presence: PresenceState,
    pub infrared: u32,
    pub red: u32,
    /// Instantaneous BPM accepted into the history this tick.
    pub accepted_bpm: Option<u8>,
    pub average_bpm: u8,
    pub tap: Option<TapEvent>,
    pub published: PublishOutcome,
    /// Outcome of the cancellation acknowledgement, when one was sent.
    pub cancel_ack: Option<PublishOutcome>,
    /// Last inbound payload rejected this tick.
    pub ignored_command: Option<CommandError>,
    /// `Some(connected)` when the link state changed.
    pub link_changed: Option<bool>,
    pub countdown_remaining: Option<u32>,
    /// The emergency countdown reached zero on this tick.
    pub countdown_expired: bool,
    pub display: DisplayRefresh,
}

/// Owner of all core state.
pub struct Monitor {
    presence: PresenceMonitor,
    beats: BeatIntegrator,
    history: RateHistory,
    demo: DemoSynthesizer,
    demo_sample: Option<DemoSample>,
    touch: TouchRouter,
    modes: ModeMachine,
    publisher: TelemetryPublisher,
    alerts: AlertSlot,
    motion: Option<InertialReading>,
    connected: bool,
    last_display_ms: u64,
    needs_full_redraw: bool,
}

impl Monitor {
    /// Build the core around a calibrated baseline. `seed` feeds the demo
    /// jitter source.
    pub fn new(
        baseline: BaselineIntensity,
        seed: u64,
    ) -> Self {
        Self {
            presence: PresenceMonitor::new(baseline),
            beats: BeatIntegrator::new(),
            history: RateHistory::new(),
            demo: DemoSynthesizer::new(seed),
            demo_sample: None,
            touch: TouchRouter::new(),
            modes: ModeMachine::new(),
            publisher: TelemetryPublisher::new(),
            alerts: AlertSlot::new(),
            motion: None,
            connected: false,
            last_display_ms: 0,
            needs_full_redraw: true,
        }
    }

    #[inline]
    pub const fn mode(&self) -> DeviceMode { self.modes.mode() }

    #[inline]
    pub const fn modes(&self) -> &ModeMachine { &self.modes }

    #[inline]
    pub const fn history(&self) -> &RateHistory { &self.history }

    #[inline]
    pub const fn average_bpm(&self) -> u8 { self.history.current_average() }

    #[inline]
    pub const fn finger_present(&self) -> bool { self.presence.is_present() }

    #[inline]
    pub const fn connected(&self) -> bool { self.connected }

    /// Run one cycle.
    pub fn tick<P, I, T, N, D>(
        &mut self,
        now_ms: u64,
        io: &mut Io<'_, P, I, T, N, D>,
    ) -> TickReport
    where
        P: PpgSensor,
        I: InertialSensor,
        T: TouchPanel,
        N: NotificationChannel,
        D: DisplaySink,
    {
        let mut ignored_command = None;
        let mut link_changed = None;
        self.drain_link(io.channel, &mut ignored_command, &mut link_changed);

        let mut transition = self.alerts.take().and_then(|countdown_s| self.modes.raise_emergency(now_ms, countdown_s));

        // PPG path
        let infrared = io.ppg.read_infrared();
        let red = io.ppg.read_red();
        let presence = self.presence.update(infrared);
        let mut forced = presence.changed;
        if presence.changed && !presence.present {
            self.history.reset();
            self.beats.reset();
            io.ppg.reset_signal();
        }

        let beat = io.ppg.beat_detected(infrared);
        let mut accepted_bpm = None;
        if beat && presence.present {
            accepted_bpm = self.beats.on_beat_detected(now_ms);
            if let Some(bpm) = accepted_bpm {
                self.history.record(bpm);
            }
        }

        if let Some(imu) = io.inertial.as_deref_mut() {
            if imu.data_ready() {
                self.motion = Some(InertialReading {
                    accel: imu.read_accel(),
                    gyro: imu.read_gyro(),
                });
            }
        }

        // Touch
        let (raw_x, raw_y) = io.touch.read_raw();
        let tap = self.touch.poll(raw_x, raw_y, now_ms, self.modes.mode());
        if transition.is_none() {
            transition = tap.and_then(|tap| self.modes.apply_touch(tap.action, now_ms));
        }

        // Demo
        if transition.is_none() {
            transition = self.modes.expire_demo(now_ms);
        }
        self.demo_sample = self.modes.demo_started_ms().map(|started_ms| {
            self.demo.sample(now_ms, started_ms, DEMO_DURATION_MS)
        });
        if self.demo_sample.is_some_and(|s| s.emergency_trigger) {
            self.modes.flag_demo_alert();
        }

        let mut cancel_ack = None;
        if let Some(t) = transition {
            if t.cause == TransitionCause::SafetyConfirmed {
                cancel_ack = Some(self.publisher.acknowledge_cancel(io.channel));
            }
            if t.to != DeviceMode::Emergency {
                forced = true;
            }
            self.needs_full_redraw = true;
        }

        let countdown_remaining = self.modes.emergency().map(|ctx| ctx.remaining_s(now_ms));
        let countdown_expired = self.modes.take_countdown_expiry(now_ms);

        let published = self.publisher.maybe_publish(now_ms, self.modes.mode(), forced, io.channel, || {
            telemetry_frame(self.demo_sample, &self.history, &self.presence, self.motion)
        });

        let display = self.refresh_display(now_ms, forced, countdown_remaining.unwrap_or(0), io.display);

        TickReport {
            mode: self.modes.mode(),
            transition,
            presence,
            infrared,
            red,
            accepted_bpm,
            average_bpm: self.history.current_average(),
            tap,
            published,
            cancel_ack,
            ignored_command,
            link_changed,
            countdown_remaining,
            countdown_expired,
            display,
        }
    }

    fn drain_link<N: NotificationChannel>(
        &mut self,
        channel: &mut N,
        ignored_command: &mut Option<CommandError>,
        link_changed: &mut Option<bool>,
    ) {
        while let Some(event) = channel.poll_event() {
            match event {
                LinkEvent::Connect => {
                    if !self.connected {
                        *link_changed = Some(true);
                    }
                    self.connected = true;
                }
                LinkEvent::Disconnect => {
                    if self.connected {
                        *link_changed = Some(false);
                    }
                    self.connected = false;
                }
                LinkEvent::Write(payload) => match parse_command(&payload) {
                    Ok(AlertCommand::EmergencyTimer { countdown_s }) => self.alerts.offer(countdown_s),
                    Err(e) => *ignored_command = Some(e),
                },
            }
        }
    }

    fn view(
        &self,
        countdown_remaining: u32,
    ) -> ScreenView {
        let (heart_rate, finger_present) = match self.demo_sample {
            Some(sample) => (sample.bpm, true),
            None => (self.history.current_average(), self.presence.is_present()),
        };
        ScreenView {
            mode: self.modes.mode(),
            heart_rate,
            finger_present,
            connected: self.connected,
            demo_alert: self.modes.demo_alert_pending(),
            countdown_remaining,
        }
    }

    fn refresh_display<D: DisplaySink>(
        &mut self,
        now_ms: u64,
        forced: bool,
        countdown_remaining: u32,
        display: &mut D,
    ) -> DisplayRefresh {
        let view = self.view(countdown_remaining);

        if self.needs_full_redraw {
            self.needs_full_redraw = false;
            self.last_display_ms = now_ms;
            display.clear();
            for command in compose_full(&view).iter() {
                display.draw(command);
            }
            return DisplayRefresh::Full;
        }

        if forced || now_ms.saturating_sub(self.last_display_ms) >= DISPLAY_REFRESH_MS {
            self.last_display_ms = now_ms;
            for command in compose_dynamic(&view).iter() {
                display.draw(command);
            }
            return DisplayRefresh::Partial;
        }

        DisplayRefresh::None
    }
}

/// Snapshot for the publisher. Demo substitutes the synthesized values.
fn telemetry_frame(
    demo_sample: Option<DemoSample>,
    history: &RateHistory,
    presence: &PresenceMonitor,
    motion: Option<InertialReading>,
) -> TelemetryFrame {
    match demo_sample {
        Some(sample) => TelemetryFrame::new(true, sample.bpm, true, Some(sample.motion)),
        None => TelemetryFrame::new(false, history.current_average(), presence.is_present(), motion),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::ports::NoInertial;
    use crate::screen::DrawCommand;

    struct Ppg {
        infrared: u32,
        beat: bool,
        signal_resets: usize,
    }

    impl PpgSensor for Ppg {
        fn read_infrared(&mut self) -> u32 { self.infrared }

        fn read_red(&mut self) -> u32 { self.infrared / 2 }

        fn beat_detected(
            &mut self,
            _infrared: u32,
        ) -> bool {
            core::mem::take(&mut self.beat)
        }

        fn reset_signal(&mut self) { self.signal_resets += 1; }
    }

    struct Touch((i32, i32));

    impl TouchPanel for Touch {
        fn read_raw(&mut self) -> (i32, i32) { self.0 }
    }

    #[derive(Default)]
    struct Link {
        connected: bool,
        inbox: Vec<LinkEvent>,
        sent: Vec<Vec<u8>>,
    }

    impl NotificationChannel for Link {
        fn connected(&self) -> bool { self.connected }

        fn publish(
            &mut self,
            payload: &[u8],
        ) {
            self.sent.push(payload.to_vec());
        }

        fn poll_event(&mut self) -> Option<LinkEvent> {
            if self.inbox.is_empty() { None } else { Some(self.inbox.remove(0)) }
        }
    }

    #[derive(Default)]
    struct Screen {
        clears: usize,
        drawn: Vec<DrawCommand>,
    }

    impl DisplaySink for Screen {
        fn clear(&mut self) { self.clears += 1; }

        fn draw(
            &mut self,
            command: &DrawCommand,
        ) {
            self.drawn.push(command.clone());
        }
    }

    struct Rig {
        ppg: Ppg,
        touch: Touch,
        link: Link,
        screen: Screen,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                ppg: Ppg {
                    infrared: 100_000,
                    beat: false,
                    signal_resets: 0,
                },
                touch: Touch((0, 0)),
                link: Link {
                    connected: true,
                    ..Default::default()
                },
                screen: Screen::default(),
            }
        }

        fn tick(
            &mut self,
            monitor: &mut Monitor,
            now_ms: u64,
        ) -> TickReport {
            let mut io = Io::<_, NoInertial, _, _, _> {
                ppg: &mut self.ppg,
                inertial: None,
                touch: &mut self.touch,
                channel: &mut self.link,
                display: &mut self.screen,
            };
            monitor.tick(now_ms, &mut io)
        }
    }

    fn monitor() -> Monitor { Monitor::new(BaselineIntensity::new(100_000), 42) }

    #[test]
    fn test_first_tick_full_redraw() {
        let mut rig = Rig::new();
        let mut m = monitor();
        let report = rig.tick(&mut m, 10);
        assert_eq!(report.display, DisplayRefresh::Full);
        assert_eq!(rig.screen.clears, 1);
        assert_eq!(rig.tick(&mut m, 20).display, DisplayRefresh::None);
        assert_eq!(rig.tick(&mut m, 510).display, DisplayRefresh::Partial);
    }

    #[test]
    fn test_beats_ignored_without_finger() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.ppg.beat = true;
        rig.tick(&mut m, 0);
        rig.ppg.beat = true;
        let report = rig.tick(&mut m, 600);
        assert!(report.accepted_bpm.is_none());
        assert_eq!(m.average_bpm(), 0);
    }

    #[test]
    fn test_presence_change_forces_publish() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.tick(&mut m, 501);
        rig.link.sent.clear();

        rig.ppg.infrared = 160_000;
        let report = rig.tick(&mut m, 600);
        assert!(report.presence.changed);
        assert!(matches!(report.published, PublishOutcome::Sent { .. }));
        assert_eq!(report.display, DisplayRefresh::Partial);
    }

    #[test]
    fn test_finger_lift_resets_pulse_detection() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.ppg.infrared = 160_000;
        rig.tick(&mut m, 0);
        rig.tick(&mut m, 10);
        assert_eq!(rig.ppg.signal_resets, 0);

        rig.ppg.infrared = 100_000;
        let report = rig.tick(&mut m, 20);
        assert!(report.presence.changed && !report.presence.present);
        assert_eq!(rig.ppg.signal_resets, 1);

        // Staying absent does not keep resetting
        rig.tick(&mut m, 30);
        assert_eq!(rig.ppg.signal_resets, 1);
    }

    #[test]
    fn test_link_events_tracked() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.link.inbox.push(LinkEvent::Connect);
        assert_eq!(rig.tick(&mut m, 0).link_changed, Some(true));
        assert!(m.connected());
        rig.link.inbox.push(LinkEvent::Connect);
        assert_eq!(rig.tick(&mut m, 10).link_changed, None);
        rig.link.inbox.push(LinkEvent::Disconnect);
        assert_eq!(rig.tick(&mut m, 20).link_changed, Some(false));
    }

    #[test]
    fn test_bad_command_reported_and_ignored() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.link.inbox.push(LinkEvent::write(br#"{"type":"reboot"}"#).unwrap());
        let report = rig.tick(&mut m, 0);
        assert_eq!(report.ignored_command, Some(CommandError::UnknownType));
        assert_eq!(report.mode, DeviceMode::Normal);
    }

    #[test]
    fn test_alert_beats_tap_in_same_tick() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.link.inbox.push(LinkEvent::write(br#"{"type":"emergency_timer","countdown":5}"#).unwrap());
        let c = crate::config::DEMO_BUTTON.center();
        rig.touch.0 = (c.x, c.y);
        let report = rig.tick(&mut m, 1_000);
        assert_eq!(report.transition.map(|t| t.cause), Some(TransitionCause::AlertCommand));
        assert_eq!(report.mode, DeviceMode::Emergency);
        assert_eq!(report.countdown_remaining, Some(5));
    }

    #[test]
    fn test_demo_substitutes_frame_values() {
        let mut rig = Rig::new();
        let mut m = monitor();
        let c = crate::config::DEMO_BUTTON.center();
        rig.touch.0 = (c.x, c.y);
        let report = rig.tick(&mut m, 1_000);
        assert_eq!(report.mode, DeviceMode::Demo);
        let sent = std::string::String::from_utf8(rig.link.sent.last().unwrap().clone()).unwrap();
        assert!(sent.starts_with(r#"{"demo":true,"heartRate":70,"fingerPresent":true,"accel":"#));
    }

    #[test]
    fn test_emergency_expiry_reported_once() {
        let mut rig = Rig::new();
        let mut m = monitor();
        rig.link.inbox.push(LinkEvent::write(br#"{"type":"emergency_timer","countdown":1}"#).unwrap());
        rig.tick(&mut m, 0);
        assert!(!rig.tick(&mut m, 500).countdown_expired);
        let report = rig.tick(&mut m, 1_000);
        assert!(report.countdown_expired);
        assert_eq!(report.countdown_remaining, Some(0));
        assert!(!rig.tick(&mut m, 1_500).countdown_expired);
        assert_eq!(m.mode(), DeviceMode::Emergency);
        let last = rig.screen.drawn.last().unwrap();
        assert_eq!(last.text.as_str(), "SOS 0s");
    }
}
