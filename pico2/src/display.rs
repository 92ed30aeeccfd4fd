//! ST7789 240x280 panel over blocking SPI.
//!
//! The panel's glass is 240x280 inside a 240x320 controller, so the driver
//! is told about the 20-row offset. Colors are inverted on this IPS panel.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::Builder;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use static_cell::StaticCell;
use wristband_pico2::config::{DISPLAY_SPI_HZ, PANEL_HEIGHT, PANEL_ROW_OFFSET, PANEL_WIDTH};

/// Interface buffer for batching pixel writes.
static SPI_BUFFER: StaticCell<[u8; 512]> = StaticCell::new();

type DisplaySpi<'d> = ExclusiveDevice<Spi<'d, SPI1, Blocking>, Output<'d>, NoDelay>;

/// Display type for the wristband panel.
pub type WristDisplay = mipidsi::Display<SpiInterface<'static, DisplaySpi<'static>, Output<'static>>, ST7789, Output<'static>>;

/// Bring up the panel. Halts on failure: without a screen the wearer cannot
/// confirm an emergency.
pub fn init_display(
    spi: Spi<'static, SPI1, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
) -> WristDisplay {
    let Ok(spi_device) = ExclusiveDevice::new_no_delay(spi, cs);
    let buffer = SPI_BUFFER.init([0; 512]);
    let di = SpiInterface::new(spi_device, dc, buffer);

    match Builder::new(ST7789, di)
        .display_size(PANEL_WIDTH, PANEL_HEIGHT)
        .display_offset(0, PANEL_ROW_OFFSET)
        .invert_colors(ColorInversion::Inverted)
        .reset_pin(rst)
        .init(&mut embassy_time::Delay)
    {
        Ok(display) => display,
        Err(_) => defmt::panic!("ST7789 init failed"),
    }
}

/// SPI configuration for the ST7789 display.
pub fn display_spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = DISPLAY_SPI_HZ;
    config
}
