//! Collaborator interfaces.
//!
//! The core never talks to hardware. Each tick it reads the sensors and the
//! touch panel through these traits, and pushes telemetry and draw commands
//! out through them. Board crates implement them over real drivers; tests
//! implement them over plain structs.

use serde::Serialize;

use crate::link::LinkEvent;
use crate::screen::DrawCommand;

/// Three-axis reading (accelerometer in g, gyroscope in deg/s).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(
        x: f32,
        y: f32,
        z: f32,
    ) -> Self {
        Self { x, y, z }
    }
}

impl From<(f32, f32, f32)> for Vec3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self { Self { x, y, z } }
}

/// One accelerometer + gyroscope sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InertialReading {
    pub accel: Vec3,
    pub gyro: Vec3,
}

/// Optical heart-rate front end.
pub trait PpgSensor {
    /// Latest infrared intensity.
    fn read_infrared(&mut self) -> u32;

    /// Latest red intensity.
    fn read_red(&mut self) -> u32;

    /// Whether `infrared` completes a heart beat.
    fn beat_detected(
        &mut self,
        infrared: u32,
    ) -> bool;

    /// Drop beat-detection history. Called when the finger is lifted.
    fn reset_signal(&mut self) {}
}

/// Optional accelerometer/gyroscope.
pub trait InertialSensor {
    fn data_ready(&mut self) -> bool;

    fn read_accel(&mut self) -> Vec3;

    fn read_gyro(&mut self) -> Vec3;
}

/// Placeholder for boards without an inertial sensor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInertial;

impl InertialSensor for NoInertial {
    fn data_ready(&mut self) -> bool { false }

    fn read_accel(&mut self) -> Vec3 { Vec3::default() }

    fn read_gyro(&mut self) -> Vec3 { Vec3::default() }
}

/// Touch controller returning raw coordinates. `x <= 0 || y <= 0` means
/// nothing is touching the panel.
pub trait TouchPanel {
    fn read_raw(&mut self) -> (i32, i32);
}

/// Wireless notification channel.
pub trait NotificationChannel {
    /// Whether a peer is connected right now.
    fn connected(&self) -> bool;

    /// Deliver one payload. Only called while connected; delivery failures
    /// are the channel's business.
    fn publish(
        &mut self,
        payload: &[u8],
    );

    /// Next pending link event, drained at the top of each tick.
    fn poll_event(&mut self) -> Option<LinkEvent>;
}

/// Display receiving high-level region updates.
pub trait DisplaySink {
    /// Wipe the whole screen before a full redraw.
    fn clear(&mut self);

    /// Paint one region.
    fn draw(
        &mut self,
        command: &DrawCommand,
    );
}

/// Mutable borrows of every collaborator for one tick.
pub struct Io<'a, P, I, T, N, D> {
    pub ppg: &'a mut P,
    pub inertial: Option<&'a mut I>,
    pub touch: &'a mut T,
    pub channel: &'a mut N,
    pub display: &'a mut D,
}
