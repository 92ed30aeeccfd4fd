//! Inbound side of the notification link.
//!
//! The wireless stack runs on its own and hands the core a closed set of
//! events. They are drained at the top of every tick; a `Write` carrying an
//! alert command is parsed here and parked in the [`AlertSlot`] until the
//! state machine consumes it in the same tick.

use heapless::Vec;
use serde::Deserialize;

use crate::config::LINK_PAYLOAD_LEN;
use crate::error::CommandError;

/// Bytes of one inbound payload.
pub type LinkPayload = Vec<u8, LINK_PAYLOAD_LEN>;

/// Event raised by the wireless stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// A peer connected.
    Connect,
    /// The peer went away.
    Disconnect,
    /// The peer wrote a payload.
    Write(LinkPayload),
}

impl LinkEvent {
    /// Build a `Write` event, `None` if `bytes` exceeds `LINK_PAYLOAD_LEN`.
    pub fn write(bytes: &[u8]) -> Option<Self> { LinkPayload::from_slice(bytes).ok().map(LinkEvent::Write) }
}

/// Command type that raises an emergency.
pub const EMERGENCY_TIMER: &str = "emergency_timer";

/// Command understood by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertCommand {
    /// `{"type":"emergency_timer","countdown":N}`
    EmergencyTimer { countdown_s: u32 },
}

#[derive(Deserialize)]
struct RawCommand<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(default)]
    countdown: Option<u32>,
}

/// Parse one command payload. Surrounding whitespace (line endings from a
/// serial link) is ignored.
pub fn parse_command(payload: &[u8]) -> Result<AlertCommand, CommandError> {
    let text = core::str::from_utf8(payload).map_err(|_| CommandError::Malformed)?;
    let (raw, _) = serde_json_core::from_str::<RawCommand<'_>>(text.trim()).map_err(|_| CommandError::Malformed)?;

    match raw.kind {
        EMERGENCY_TIMER => {
            let countdown_s = raw.countdown.ok_or(CommandError::MissingCountdown)?;
            Ok(AlertCommand::EmergencyTimer { countdown_s })
        }
        _ => Err(CommandError::UnknownType),
    }
}

/// Single-writer hand-off for a received alert countdown.
///
/// The latest offer wins; the consumer empties the slot.
#[derive(Debug, Default)]
pub struct AlertSlot {
    pending: Option<u32>,
}

impl AlertSlot {
    pub const fn new() -> Self { Self { pending: None } }

    /// Park a countdown for the next consumer.
    pub fn offer(
        &mut self,
        countdown_s: u32,
    ) {
        self.pending = Some(countdown_s);
    }

    /// Take the parked countdown, leaving the slot empty.
    pub fn take(&mut self) -> Option<u32> { self.pending.take() }

    #[inline]
    pub const fn is_pending(&self) -> bool { self.pending.is_some() }
}

// =============================================================================
// Unit Tests
// =============================================================================
