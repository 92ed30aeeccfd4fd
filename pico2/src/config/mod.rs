//! Board configuration for the wristband prototype.
//!
//! # Wiring (Raspberry Pi Pico 2)
//!
//! | Peripheral | Bus | Pins |
//! |------------|-----|------|
//! | MAX30102 PPG | I2C0 @ 400 kHz | SDA GP4, SCL GP5 |
//! | CST816S touch | I2C0 (shared) | SDA GP4, SCL GP5, RST GP14 |
//! | ST7789 240x280 | SPI1 | CLK GP10, MOSI GP11, CS GP9, DC GP8, RST GP12, BL GP13 |
//! | HC-05 serial link | UART0 | TX GP0, RX GP1, STATE GP2 |

/// I2C bus speed shared by the PPG sensor and the touch controller.
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// ST7789 SPI clock.
pub const DISPLAY_SPI_HZ: u32 = 40_000_000;

/// Panel size before any rotation.
pub const PANEL_WIDTH: u16 = 240;
pub const PANEL_HEIGHT: u16 = 280;

/// The 240x280 glass sits 20 rows into the controller's 240x320 RAM.
pub const PANEL_ROW_OFFSET: u16 = 20;

/// HC-05 factory baud rate.
pub const LINK_BAUD: u32 = 9_600;

/// Period of the monitor tick.
pub const TICK_MS: u64 = 10;

/// UART software buffer sizes.
pub const LINK_TX_BUF: usize = 256;
pub const LINK_RX_BUF: usize = 128;

/// Queued link events between the receive tasks and the tick loop.
pub const LINK_EVENT_QUEUE: usize = 8;

const _: () = assert!(PANEL_WIDTH as u32 == wristband_common::config::SCREEN_WIDTH);
const _: () = assert!(PANEL_HEIGHT as u32 == wristband_common::config::SCREEN_HEIGHT);
