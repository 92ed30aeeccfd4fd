//! Outbound telemetry.
//!
//! A [`TelemetryFrame`] is a snapshot of what the wearer's phone needs: the
//! mode, the averaged heart rate, whether the band is worn and, when there is
//! an inertial source, the motion triple. Frames are encoded as compact JSON:
//!
//! ```text
//! {"demo":false,"heartRate":72,"fingerPresent":true,"accel":{"x":0.0,"y":0.0,"z":1.0},"gyro":{...}}
//! ```
//!
//! The publisher owns the cadence. Periodic frames are suppressed while in
//! Emergency; the only Emergency output is the cancellation acknowledgement.

use serde::Serialize;

use crate::config::{TELEMETRY_PAYLOAD_LEN, TELEMETRY_PERIOD_MS};
use crate::error::TelemetryError;
use crate::mode::DeviceMode;
use crate::ports::{InertialReading, NotificationChannel, Vec3};

/// One published snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryFrame {
    pub demo: bool,
    /// Averaged BPM, 0 when unknown.
    pub heart_rate: u8,
    pub finger_present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accel: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gyro: Option<Vec3>,
}

impl TelemetryFrame {
    pub fn new(
        demo: bool,
        heart_rate: u8,
        finger_present: bool,
        motion: Option<InertialReading>,
    ) -> Self {
        Self {
            demo,
            heart_rate,
            finger_present,
            accel: motion.map(|m| m.accel),
            gyro: motion.map(|m| m.gyro),
        }
    }

    /// Encode into `buf`, returning the payload length.
    pub fn encode(
        &self,
        buf: &mut [u8],
    ) -> Result<usize, TelemetryError> {
        serde_json_core::to_slice(self, buf).map_err(|_| TelemetryError::Encode)
    }
}

/// Message type of the cancellation acknowledgement.
pub const EMERGENCY_CANCELLED: &str = "emergency_cancelled";

/// `{"type":"emergency_cancelled"}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CancelAck {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl CancelAck {
    pub const fn new() -> Self {
        Self {
            kind: EMERGENCY_CANCELLED,
        }
    }

    pub fn encode(
        &self,
        buf: &mut [u8],
    ) -> Result<usize, TelemetryError> {
        serde_json_core::to_slice(self, buf).map_err(|_| TelemetryError::Encode)
    }
}

impl Default for CancelAck {
    fn default() -> Self { Self::new() }
}

/// Result of a publish attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishOutcome {
    /// Not due, or suppressed by the current mode.
    Skipped,
    /// Handed to the channel.
    Sent { len: usize },
    /// Due, but nobody is connected. Counts as published.
    NotConnected,
    /// Due, but the payload could not be encoded.
    Failed(TelemetryError),
}

impl PublishOutcome {
    /// Whether the attempt consumed a publish slot.
    pub const fn attempted(self) -> bool { !matches!(self, PublishOutcome::Skipped) }
}

/// Cadence keeper for telemetry frames.
#[derive(Debug, Default)]
pub struct TelemetryPublisher {
    last_publish_ms: u64,
}

impl TelemetryPublisher {
    pub const fn new() -> Self { Self { last_publish_ms: 0 } }

    #[inline]
    pub const fn last_publish_ms(&self) -> u64 { self.last_publish_ms }

    /// Whether a frame is due at `now_ms`.
    pub fn is_due(
        &self,
        now_ms: u64,
        mode: DeviceMode,
        forced: bool,
    ) -> bool {
        if mode == DeviceMode::Emergency {
            return false;
        }
        forced || now_ms.saturating_sub(self.last_publish_ms) > TELEMETRY_PERIOD_MS
    }

    /// Publish the frame built by `frame` if one is due.
    ///
    /// The frame is only built when it is going to be sent. The publish time
    /// is recorded whether or not a peer is connected.
    pub fn maybe_publish<N, F>(
        &mut self,
        now_ms: u64,
        mode: DeviceMode,
        forced: bool,
        channel: &mut N,
        frame: F,
    ) -> PublishOutcome
    where
        N: NotificationChannel,
        F: FnOnce() -> TelemetryFrame,
    {
        if !self.is_due(now_ms, mode, forced) {
            return PublishOutcome::Skipped;
        }
        self.last_publish_ms = now_ms;

        if !channel.connected() {
            return PublishOutcome::NotConnected;
        }

        let mut buf = [0u8; TELEMETRY_PAYLOAD_LEN];
        match frame().encode(&mut buf) {
            Ok(len) => {
                channel.publish(&buf[..len]);
                PublishOutcome::Sent { len }
            }
            Err(e) => PublishOutcome::Failed(e),
        }
    }

    /// Send the cancellation acknowledgement, bypassing the cadence.
    pub fn acknowledge_cancel<N: NotificationChannel>(
        &mut self,
        channel: &mut N,
    ) -> PublishOutcome {
        if !channel.connected() {
            return PublishOutcome::NotConnected;
        }
        let mut buf = [0u8; TELEMETRY_PAYLOAD_LEN];
        match CancelAck::new().encode(&mut buf) {
            Ok(len) => {
                channel.publish(&buf[..len]);
                PublishOutcome::Sent { len }
            }
            Err(e) => PublishOutcome::Failed(e),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
