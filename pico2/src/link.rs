//! HC-05 style serial link to the phone.
//!
//! Outbound payloads are written as single lines. Inbound bytes are framed
//! into lines by a receive task and queued as [`LinkEvent::Write`]. The
//! module's STATE pin is high while a phone is paired; a second task turns
//! its edges into `Connect` / `Disconnect`.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{debug, warn};
use embassy_rp::gpio::Input;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_io::Write as _;
use embedded_io_async::Read as _;
use wristband_common::config::LINK_PAYLOAD_LEN;
use wristband_common::link::LinkEvent;
use wristband_common::NotificationChannel;
use wristband_pico2::config::LINK_EVENT_QUEUE;
use wristband_pico2::line_buffer::LineFramer;

/// Events from the link tasks to the tick loop.
static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, LINK_EVENT_QUEUE> = Channel::new();

/// Mirror of the STATE pin, read by `connected()`.
static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Receive task: bytes -> lines -> `Write` events.
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    let mut framer = LineFramer::<LINK_PAYLOAD_LEN>::new();
    let mut chunk = [0u8; 32];

    loop {
        let n = match rx.read(&mut chunk).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &chunk[..n] {
            match framer.push(byte) {
                Some(Ok(line)) => {
                    debug!("Link line ({} bytes)", line.len());
                    if LINK_EVENTS.try_send(LinkEvent::Write(line)).is_err() {
                        warn!("Link event queue full, dropping command");
                    }
                }
                Some(Err(_)) => warn!("Link line too long, dropped"),
                None => {}
            }
        }
    }
}

/// STATE pin watcher: level changes -> `Connect` / `Disconnect`.
#[embassy_executor::task]
pub async fn link_state_task(mut state: Input<'static>) {
    let mut connected = state.is_high();
    publish_state(connected).await;

    loop {
        state.wait_for_any_edge().await;
        let level = state.is_high();
        if level != connected {
            connected = level;
            publish_state(connected).await;
        }
    }
}

async fn publish_state(connected: bool) {
    CONNECTED.store(connected, Ordering::Relaxed);
    let event = if connected { LinkEvent::Connect } else { LinkEvent::Disconnect };
    LINK_EVENTS.send(event).await;
}

/// Notification channel over the UART transmitter.
pub struct UartLink {
    tx: BufferedUartTx,
}

impl UartLink {
    pub fn new(tx: BufferedUartTx) -> Self { Self { tx } }
}

impl NotificationChannel for UartLink {
    fn connected(&self) -> bool { CONNECTED.load(Ordering::Relaxed) }

    fn publish(
        &mut self,
        payload: &[u8],
    ) {
        if self.tx.write_all(payload).and_then(|()| self.tx.write_all(b"\n")).is_err() {
            warn!("UART write failed, frame dropped");
        }
    }

    fn poll_event(&mut self) -> Option<LinkEvent> { LINK_EVENTS.try_receive().ok() }
}
