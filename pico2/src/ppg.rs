//! PPG collaborator: MAX30102 samples plus the pulse detector.

use embedded_hal::i2c::I2c;
use wristband_common::PpgSensor;

use crate::max30102::{Max30102, Max30102Error, PpgSample};
use crate::pulse::PulseDetector;

/// [`PpgSensor`] backed by a MAX30102.
///
/// `read_infrared` drains the FIFO; `read_red` returns the red half of the
/// same sample. A failed FIFO read keeps the previous sample and is counted.
pub struct HeartSensor<I2C> {
    sensor: Max30102<I2C>,
    detector: PulseDetector,
    read_errors: u32,
}

impl<I2C: I2c> HeartSensor<I2C> {
    /// Wrap an initialized sensor.
    pub const fn new(sensor: Max30102<I2C>) -> Self {
        Self {
            sensor,
            detector: PulseDetector::new(),
            read_errors: 0,
        }
    }

    /// Newest sample drained from the FIFO, or `None` when no new sample
    /// arrived since the last read.
    pub fn sample(&mut self) -> Result<Option<PpgSample>, Max30102Error<I2C::Error>> { self.sensor.poll() }

    /// FIFO reads that failed since startup.
    #[inline]
    pub const fn read_errors(&self) -> u32 { self.read_errors }

    pub fn into_inner(self) -> Max30102<I2C> { self.sensor }
}

impl<I2C: I2c> PpgSensor for HeartSensor<I2C> {
    fn read_infrared(&mut self) -> u32 {
        if self.sensor.poll().is_err() {
            self.read_errors = self.read_errors.saturating_add(1);
        }
        self.sensor.latest().infrared
    }

    fn read_red(&mut self) -> u32 { self.sensor.latest().red }

    fn beat_detected(
        &mut self,
        infrared: u32,
    ) -> bool {
        self.detector.feed(infrared)
    }

    fn reset_signal(&mut self) { self.detector.reset(); }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_i2c::FakeI2c;
    use crate::max30102::{
        ADDRESS,
        EXPECTED_PART_ID,
        REG_FIFO_DATA,
        REG_FIFO_RD_PTR,
        REG_FIFO_WR_PTR,
        REG_PART_ID,
    };

    fn bus_with_sample(
        red: u32,
        infrared: u32,
    ) -> FakeI2c {
        let mut bus = FakeI2c::new(ADDRESS);
        bus.regs[REG_PART_ID as usize] = EXPECTED_PART_ID;
        bus.fifo_port = Some((REG_FIFO_DATA, REG_FIFO_RD_PTR));
        for v in [red, infrared] {
            bus.fifo.extend([(v >> 16) as u8, (v >> 8) as u8, v as u8]);
        }
        bus.regs[REG_FIFO_WR_PTR as usize] = 1;
        bus
    }

    #[test]
    fn test_reads_ir_then_red_of_same_sample() {
        let mut ppg = HeartSensor::new(Max30102::new(bus_with_sample(40_000, 150_000)));
        assert_eq!(ppg.read_infrared(), 150_000);
        assert_eq!(ppg.read_red(), 40_000);
        // FIFO now empty, the sample is kept
        assert_eq!(ppg.read_infrared(), 150_000);
        assert_eq!(ppg.read_errors(), 0);
    }

    #[test]
    fn test_bus_error_keeps_previous_reading() {
        let mut ppg = HeartSensor::new(Max30102::new(bus_with_sample(1, 120_000)));
        assert_eq!(ppg.read_infrared(), 120_000);

        ppg.sensor.bus_mut().fail = true;
        assert_eq!(ppg.read_infrared(), 120_000);
        assert_eq!(ppg.read_infrared(), 120_000);
        assert_eq!(ppg.read_errors(), 2);
        assert!(ppg.sample().is_err());
    }

    #[test]
    fn test_sample_only_reports_fresh_data() {
        let mut ppg = HeartSensor::new(Max30102::new(bus_with_sample(40_000, 150_000)));
        let fresh = ppg.sample().unwrap();
        assert_eq!(
            fresh,
            Some(PpgSample {
                red: 40_000,
                infrared: 150_000
            })
        );
        // Drained FIFO yields nothing rather than the previous pair
        assert_eq!(ppg.sample().unwrap(), None);
        assert_eq!(ppg.sample().unwrap(), None);
    }

    #[test]
    fn test_empty_fifo_at_startup_is_not_a_sample() {
        let mut bus = FakeI2c::new(ADDRESS);
        bus.regs[REG_PART_ID as usize] = EXPECTED_PART_ID;
        bus.fifo_port = Some((REG_FIFO_DATA, REG_FIFO_RD_PTR));
        let mut ppg = HeartSensor::new(Max30102::new(bus));
        assert_eq!(ppg.sample().unwrap(), None);
    }

    #[test]
    fn test_reset_signal_clears_detector() {
        let mut ppg = HeartSensor::new(Max30102::new(bus_with_sample(1, 120_000)));
        for ir in [120_000, 120_400, 119_600, 120_400] {
            ppg.beat_detected(ir);
        }
        assert_ne!(ppg.detector, PulseDetector::new());
        ppg.reset_signal();
        assert_eq!(ppg.detector, PulseDetector::new());
    }

    #[test]
    fn test_flat_signal_never_beats() {
        let mut ppg = HeartSensor::new(Max30102::new(bus_with_sample(1, 120_000)));
        for _ in 0..200 {
            let ir = ppg.read_infrared();
            assert!(!ppg.beat_detected(ir));
        }
    }
}
