//! CST816S capacitive touch controller over I2C.
//!
//! The controller keeps the latest report in a small register block starting
//! at `GESTURE_ID`:
//!
//! | Offset | Register | Contents |
//! |--------|----------|----------|
//! | 0 | `0x01` | gesture id |
//! | 1 | `0x02` | number of fingers (0 or 1) |
//! | 2 | `0x03` | x high nibble (bits 0..3) |
//! | 3 | `0x04` | x low byte |
//! | 4 | `0x05` | y high nibble (bits 0..3) |
//! | 5 | `0x06` | y low byte |

use embedded_hal::i2c::I2c;
use thiserror::Error;
use wristband_common::TouchPanel;

/// 7-bit bus address.
pub const ADDRESS: u8 = 0x15;

pub(crate) const REG_GESTURE_ID: u8 = 0x01;
pub(crate) const REG_CHIP_ID: u8 = 0xA7;
pub(crate) const REG_DIS_AUTO_SLEEP: u8 = 0xFE;

const REPORT_LEN: usize = 6;

/// Driver errors.
#[derive(Debug, Error)]
pub enum Cst816Error<E> {
    #[error("I2C bus error")]
    I2c(E),
}

/// One contact point in panel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
    pub gesture: u8,
}

/// CST816S on an owned I2C bus (or a shared-bus device).
pub struct Cst816s<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Cst816s<I2C> {
    pub const fn new(i2c: I2C) -> Self { Self { i2c } }

    pub fn chip_id(&mut self) -> Result<u8, Cst816Error<I2C::Error>> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[REG_CHIP_ID], &mut id)
            .map_err(Cst816Error::I2c)?;
        Ok(id[0])
    }

    /// Keep the controller awake so polling never hits a sleeping chip.
    pub fn disable_auto_sleep(&mut self) -> Result<(), Cst816Error<I2C::Error>> {
        self.i2c.write(ADDRESS, &[REG_DIS_AUTO_SLEEP, 0x01]).map_err(Cst816Error::I2c)
    }

    /// Current contact, `None` when nothing touches the panel.
    pub fn read_touch(&mut self) -> Result<Option<TouchPoint>, Cst816Error<I2C::Error>> {
        let mut report = [0u8; REPORT_LEN];
        self.i2c
            .write_read(ADDRESS, &[REG_GESTURE_ID], &mut report)
            .map_err(Cst816Error::I2c)?;

        if report[1] == 0 {
            return Ok(None);
        }
        Ok(Some(TouchPoint {
            x: u16::from(report[2] & 0x0F) << 8 | u16::from(report[3]),
            y: u16::from(report[4] & 0x0F) << 8 | u16::from(report[5]),
            gesture: report[0],
        }))
    }

    /// Raw coordinates in the monitor's convention: `(0, 0)` when released.
    ///
    /// Bus errors read as released, so a flaky bus can only drop taps.
    pub fn read_raw(&mut self) -> (i32, i32) {
        match self.read_touch() {
            Ok(Some(p)) => (i32::from(p.x), i32::from(p.y)),
            Ok(None) | Err(_) => (0, 0),
        }
    }

    /// Give the bus back.
    pub fn release(self) -> I2C { self.i2c }
}

impl<I2C: I2c> TouchPanel for Cst816s<I2C> {
    fn read_raw(&mut self) -> (i32, i32) { Cst816s::read_raw(self) }
}

// =============================================================================
// Unit Tests
// =============================================================================
