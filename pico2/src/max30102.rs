//! MAX30102 pulse-oximetry front end over I2C.
//!
//! Only what the monitor needs: part-id check, the SpO2-mode setup used by
//! the prototype (red LED dimmed so the wearer can see the sensor is live)
//! and draining the FIFO into the latest red/IR pair.
//!
//! # FIFO layout
//!
//! In SpO2 mode every sample is 6 bytes: 3 bytes red, then 3 bytes IR, each
//! big-endian with the top 6 bits unused (18-bit ADC).

use embedded_hal::i2c::I2c;
use thiserror::Error;

/// 7-bit bus address.
pub const ADDRESS: u8 = 0x57;

/// Expected contents of `PART_ID`.
pub const EXPECTED_PART_ID: u8 = 0x15;

// Register map
pub(crate) const REG_FIFO_WR_PTR: u8 = 0x04;
pub(crate) const REG_OVF_COUNTER: u8 = 0x05;
pub(crate) const REG_FIFO_RD_PTR: u8 = 0x06;
pub(crate) const REG_FIFO_DATA: u8 = 0x07;
pub(crate) const REG_FIFO_CONFIG: u8 = 0x08;
pub(crate) const REG_MODE_CONFIG: u8 = 0x09;
pub(crate) const REG_SPO2_CONFIG: u8 = 0x0A;
pub(crate) const REG_LED1_PA: u8 = 0x0C;
pub(crate) const REG_LED2_PA: u8 = 0x0D;
pub(crate) const REG_PART_ID: u8 = 0xFF;

const MODE_RESET: u8 = 0x40;
const MODE_SPO2: u8 = 0x03;

/// 4-sample averaging, FIFO rollover, almost-full at 17 free slots.
const FIFO_CONFIG: u8 = 0x40 | 0x10 | 0x0F;
/// ADC range 4096 nA, 400 samples/s, 411 us pulse width (18 bit).
const SPO2_CONFIG: u8 = 0x20 | 0x0C | 0x03;

/// Default IR LED current (about 6.4 mA).
pub const IR_AMPLITUDE: u8 = 0x1F;
/// Red LED current kept low as a "sensor running" indicator.
pub const RED_AMPLITUDE: u8 = 0x0A;

const FIFO_DEPTH: u8 = 32;
const BYTES_PER_SAMPLE: usize = 6;
const SAMPLE_MASK: u32 = 0x3_FFFF;
const RESET_POLLS: usize = 100;

/// Driver errors.
#[derive(Debug, Error)]
pub enum Max30102Error<E> {
    #[error("I2C bus error")]
    I2c(E),
    #[error("unexpected part id {0:#04x}")]
    WrongPartId(u8),
    #[error("soft reset did not complete")]
    ResetTimeout,
}

/// One red/IR pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PpgSample {
    pub red: u32,
    pub infrared: u32,
}

/// MAX30102 on an owned I2C bus (or a shared-bus device).
pub struct Max30102<I2C> {
    i2c: I2C,
    latest: PpgSample,
}

impl<I2C: I2c> Max30102<I2C> {
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            latest: PpgSample { red: 0, infrared: 0 },
        }
    }

    /// Check the part id, reset, and configure SpO2 mode.
    pub fn init(&mut self) -> Result<(), Max30102Error<I2C::Error>> {
        let id = self.part_id()?;
        if id != EXPECTED_PART_ID {
            return Err(Max30102Error::WrongPartId(id));
        }

        self.write_reg(REG_MODE_CONFIG, MODE_RESET)?;
        let mut cleared = false;
        for _ in 0..RESET_POLLS {
            if self.read_reg(REG_MODE_CONFIG)? & MODE_RESET == 0 {
                cleared = true;
                break;
            }
        }
        if !cleared {
            return Err(Max30102Error::ResetTimeout);
        }

        self.write_reg(REG_FIFO_CONFIG, FIFO_CONFIG)?;
        self.write_reg(REG_MODE_CONFIG, MODE_SPO2)?;
        self.write_reg(REG_SPO2_CONFIG, SPO2_CONFIG)?;
        self.set_red_amplitude(RED_AMPLITUDE)?;
        self.set_ir_amplitude(IR_AMPLITUDE)?;
        self.clear_fifo()
    }

    pub fn part_id(&mut self) -> Result<u8, Max30102Error<I2C::Error>> { self.read_reg(REG_PART_ID) }

    pub fn set_red_amplitude(
        &mut self,
        amplitude: u8,
    ) -> Result<(), Max30102Error<I2C::Error>> {
        self.write_reg(REG_LED1_PA, amplitude)
    }

    pub fn set_ir_amplitude(
        &mut self,
        amplitude: u8,
    ) -> Result<(), Max30102Error<I2C::Error>> {
        self.write_reg(REG_LED2_PA, amplitude)
    }

    /// Reset the FIFO pointers.
    pub fn clear_fifo(&mut self) -> Result<(), Max30102Error<I2C::Error>> {
        self.write_reg(REG_FIFO_WR_PTR, 0)?;
        self.write_reg(REG_OVF_COUNTER, 0)?;
        self.write_reg(REG_FIFO_RD_PTR, 0)
    }

    /// Drain the FIFO. Returns the newest sample, or `None` when the FIFO
    /// was empty.
    pub fn poll(&mut self) -> Result<Option<PpgSample>, Max30102Error<I2C::Error>> {
        let write = self.read_reg(REG_FIFO_WR_PTR)?;
        let read = self.read_reg(REG_FIFO_RD_PTR)?;
        let pending = write.wrapping_sub(read) % FIFO_DEPTH;
        if pending == 0 {
            return Ok(None);
        }

        let mut raw = [0u8; BYTES_PER_SAMPLE];
        for _ in 0..pending {
            self.i2c
                .write_read(ADDRESS, &[REG_FIFO_DATA], &mut raw)
                .map_err(Max30102Error::I2c)?;
            self.latest = PpgSample {
                red: Self::sample(&raw[0..3]),
                infrared: Self::sample(&raw[3..6]),
            };
        }
        Ok(Some(self.latest))
    }

    /// Most recent sample read by [`poll`](Self::poll).
    #[inline]
    pub const fn latest(&self) -> PpgSample { self.latest }

    /// Give the bus back.
    pub fn release(self) -> I2C { self.i2c }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut I2C { &mut self.i2c }

    fn sample(bytes: &[u8]) -> u32 {
        let value = u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2]);
        value & SAMPLE_MASK
    }

    fn read_reg(
        &mut self,
        reg: u8,
    ) -> Result<u8, Max30102Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut buf)
            .map_err(Max30102Error::I2c)?;
        Ok(buf[0])
    }

    fn write_reg(
        &mut self,
        reg: u8,
        value: u8,
    ) -> Result<(), Max30102Error<I2C::Error>> {
        self.i2c.write(ADDRESS, &[reg, value]).map_err(Max30102Error::I2c)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
