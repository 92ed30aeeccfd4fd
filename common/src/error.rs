//! Error types of the state core.

use thiserror::Error;

/// Telemetry could not be turned into a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// The frame does not fit the fixed encode buffer.
    #[error("telemetry payload does not fit the encode buffer")]
    Encode,
}

/// Inbound alert command rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Not UTF-8 or not a JSON object with a `type` string.
    #[error("malformed command payload")]
    Malformed,
    /// Valid JSON, but a `type` this device does not handle.
    #[error("unknown command type")]
    UnknownType,
    /// `emergency_timer` without a usable `countdown`.
    #[error("emergency_timer command without countdown")]
    MissingCountdown,
}
