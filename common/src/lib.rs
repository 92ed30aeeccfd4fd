//! Real-time state core of the wristband vital-sign monitor.
//!
//! Platform-agnostic code shared by the firmware and the host tests:
//!
//! - [`config`]: Layout regions, thresholds, cadences
//! - [`presence`]: Baseline calibration and worn / not-worn detection
//! - [`beat`]: Inter-beat interval to instantaneous BPM
//! - [`rate_history`]: Rolling BPM average
//! - [`demo`]: Scripted demo heart rate and motion
//! - [`touch`]: Tap debounce and region hit-testing
//! - [`mode`]: Normal / Demo / Emergency state machine
//! - [`link`]: Inbound link events and alert commands
//! - [`telemetry`]: Outbound frames and their cadence
//! - [`screen`], [`render`]: Draw commands and their `embedded-graphics` renderer
//! - [`monitor`]: The per-cycle orchestrator tying it all together
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests. Hardware is only reached through
//! the traits in [`ports`], and time only through the millisecond timestamp
//! handed to [`monitor::Monitor::tick`].

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod beat;
pub mod colors;
pub mod config;
pub mod demo;
pub mod error;
pub mod link;
pub mod mode;
pub mod monitor;
pub mod ports;
pub mod presence;
pub mod rate_history;
pub mod render;
pub mod screen;
pub mod styles;
pub mod telemetry;
pub mod touch;

// Re-export commonly used items
pub use error::{CommandError, TelemetryError};
pub use mode::DeviceMode;
pub use monitor::{Monitor, TickReport};
pub use ports::{DisplaySink, InertialSensor, Io, NotificationChannel, PpgSensor, TouchPanel};
pub use presence::{BaselineCalibrator, BaselineIntensity};
