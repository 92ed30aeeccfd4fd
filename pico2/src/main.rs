//! Wristband vital-sign monitor firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Reads the MAX30102 finger sensor and the CST816S touch panel, drives the
//! ST7789 screen and talks to the phone over an HC-05 serial module.
//!
//! # Architecture
//!
//! - Main task: calibrates the IR baseline, then runs the monitor tick
//!   every `TICK_MS` and logs the tick report
//! - Link RX task: frames inbound UART bytes into command lines
//! - Link state task: turns the HC-05 STATE pin into connect/disconnect
//!
//! The I2C bus is shared by the PPG sensor and the touch controller; both
//! are only touched from the main task.
//!
//! Host builds compile an empty `main` so the workspace builds everywhere.

#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
#[cfg(target_arch = "arm")]
mod display;
#[cfg(target_arch = "arm")]
mod link;
#[cfg(target_arch = "arm")]
mod report;

#[cfg(not(target_arch = "arm"))]
fn main() {}

#[cfg(target_arch = "arm")]
use {defmt_rtt as _, panic_probe as _};

#[cfg(target_arch = "arm")]
embassy_rp::bind_interrupts!(struct Irqs {
    UART0_IRQ => embassy_rp::uart::BufferedInterruptHandler<embassy_rp::peripherals::UART0>;
});

#[cfg(target_arch = "arm")]
#[embassy_executor::main]
async fn main(spawner: embassy_executor::Spawner) {
    use core::cell::RefCell;

    use defmt::info;
    use embassy_rp::gpio::{Input, Level, Output, Pull};
    use embassy_rp::i2c::{Config as I2cConfig, I2c};
    use embassy_rp::spi::Spi;
    use embassy_rp::uart::{BufferedUart, Config as UartConfig};
    use embassy_time::{Duration, Instant, Ticker};
    use embedded_hal_bus::i2c::RefCellDevice;
    use static_cell::StaticCell;
    use wristband_common::render::Canvas;
    use wristband_common::ports::NoInertial;
    use wristband_common::{BaselineCalibrator, BaselineIntensity, Io, Monitor};
    use wristband_pico2::config::{I2C_FREQUENCY_HZ, LINK_BAUD, LINK_RX_BUF, LINK_TX_BUF, TICK_MS};
    use wristband_pico2::cst816::Cst816s;
    use wristband_pico2::max30102::Max30102;
    use wristband_pico2::ppg::HeartSensor;

    use crate::display::{display_spi_config, init_display};
    use crate::link::{UartLink, link_rx_task, link_state_task};
    use crate::report::log_report;

    info!("Wristband monitor starting...");
    let p = embassy_rp::init(Default::default());

    // Display: SPI1 CLK=10, MOSI=11, CS=9, DC=8, RST=12, BL=13
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, display_spi_config());
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let _backlight = Output::new(p.PIN_13, Level::High);
    let mut canvas = Canvas::new(init_display(spi, cs, dc, rst));
    info!("Display initialized");

    // Shared I2C0: SDA=4, SCL=5
    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = RefCell::new(I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config));

    let mut max30102 = Max30102::new(RefCellDevice::new(&i2c));
    if max30102.init().is_err() {
        defmt::panic!("MAX30102 was not found. Please check wiring/power.");
    }
    info!("MAX30102 initialized");

    // Touch controller comes out of reset before the first read
    let _touch_rst = Output::new(p.PIN_14, Level::High);
    embassy_time::Timer::after_millis(50).await;
    let mut touch = Cst816s::new(RefCellDevice::new(&i2c));
    match touch.chip_id() {
        Ok(id) => info!("CST816S chip id {=u8:#x}", id),
        Err(_) => defmt::warn!("CST816S not responding, touch disabled until it answers"),
    }
    touch.disable_auto_sleep().ok();

    // HC-05 on UART0: TX=0, RX=1, STATE=2
    static TX_BUF: StaticCell<[u8; LINK_TX_BUF]> = StaticCell::new();
    static RX_BUF: StaticCell<[u8; LINK_RX_BUF]> = StaticCell::new();
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LINK_BAUD;
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        &mut TX_BUF.init([0; LINK_TX_BUF])[..],
        &mut RX_BUF.init([0; LINK_RX_BUF])[..],
        uart_config,
    );
    let (tx, rx) = uart.split();
    let state = Input::new(p.PIN_2, Pull::Down);

    spawner.spawn(link_rx_task(rx)).unwrap();
    spawner.spawn(link_state_task(state)).unwrap();
    info!("Link tasks spawned");
    let mut channel = UartLink::new(tx);

    // Baseline with nothing on the sensor
    info!("Calibrating IR baseline, keep the sensor uncovered");
    let mut sensor = HeartSensor::new(max30102);
    let mut calibrator = BaselineCalibrator::new();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    let baseline: BaselineIntensity = loop {
        if let Ok(Some(sample)) = sensor.sample()
            && let Some(baseline) = calibrator.push(sample.infrared)
        {
            break baseline;
        }
        ticker.next().await;
    };
    info!("Baseline IR = {}", baseline.value());
    info!("Place your index finger on the sensor with steady pressure.");

    let seed = Instant::now().as_ticks() ^ u64::from(baseline.value());
    let mut monitor = Monitor::new(baseline, seed);

    info!("Main loop starting");
    loop {
        let now_ms = Instant::now().as_millis();
        let mut io = Io::<_, NoInertial, _, _, _> {
            ppg: &mut sensor,
            inertial: None,
            touch: &mut touch,
            channel: &mut channel,
            display: &mut canvas,
        };
        let report = monitor.tick(now_ms, &mut io);
        log_report(&report);

        ticker.next().await;
    }
}
