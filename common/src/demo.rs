//! Scripted demo data.
//!
//! Produces a heart-rate ramp and a motion waveform that look like a wearer
//! getting agitated and then thrown around, so the screen and the phone app
//! can be shown without a finger on the sensor.
//!
//! # Script (by elapsed fraction `p` of the run)
//!
//! | Phase | BPM | Motion | Trigger |
//! |-------|-----|--------|---------|
//! | `p < 0.2` | 70 -> 130 linear | calm | no |
//! | `0.2 <= p < 0.6` | 130 +/- jitter | violent (x4) | yes |
//! | `0.6 <= p` | 130 +/- jitter | calm | yes |
//!
//! The waveform is stand-in data, not a physics model. Only the value ranges
//! are guaranteed.

use core::f32::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::thresholds::{
    DEMO_BPM_JITTER,
    DEMO_BPM_PEAK,
    DEMO_BPM_START,
    DEMO_RAMP_END,
    DEMO_VIOLENT_END,
    DEMO_VIOLENT_GAIN,
};
use crate::ports::{InertialReading, Vec3};

/// Sum of the sinusoid amplitudes on one accel axis (g, before gain).
const ACCEL_SWING: f32 = 0.4;
/// Accel jitter amplitude (g, before gain).
const ACCEL_JITTER: f32 = 0.05;
/// Sum of the sinusoid amplitudes on one gyro axis (deg/s, before gain).
const GYRO_SWING: f32 = 30.0;
/// Gyro jitter amplitude (deg/s, before gain).
const GYRO_JITTER: f32 = 2.0;

/// Largest absolute accel deviation from rest the synthesizer can emit (g).
pub const MAX_ACCEL_DEVIATION: f32 = DEMO_VIOLENT_GAIN * (ACCEL_SWING + ACCEL_JITTER);
/// Largest absolute gyro value the synthesizer can emit (deg/s).
pub const MAX_GYRO: f32 = DEMO_VIOLENT_GAIN * (GYRO_SWING + GYRO_JITTER);

/// One synthesized reading.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DemoSample {
    pub bpm: u8,
    pub motion: InertialReading,
    /// The script reached the simulated emergency.
    pub emergency_trigger: bool,
}

/// Demo waveform generator. Owns the jitter source.
pub struct DemoSynthesizer {
    rng: SmallRng,
}

impl DemoSynthesizer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Elapsed fraction of the run, clamped to `[0, 1]`.
    pub fn phase(
        now_ms: u64,
        start_ms: u64,
        duration_ms: u64,
    ) -> f32 {
        if duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(start_ms);
        (elapsed as f32 / duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Synthesize the reading at `now_ms` of a run that started at `start_ms`.
    pub fn sample(
        &mut self,
        now_ms: u64,
        start_ms: u64,
        duration_ms: u64,
    ) -> DemoSample {
        let p = Self::phase(now_ms, start_ms, duration_ms);
        let emergency_trigger = p >= DEMO_RAMP_END;

        let bpm = if emergency_trigger {
            let jitter = self.rng.gen_range(-DEMO_BPM_JITTER..=DEMO_BPM_JITTER);
            (DEMO_BPM_PEAK as i32 + jitter) as u8
        } else {
            let ramp = p / DEMO_RAMP_END;
            (DEMO_BPM_START + (DEMO_BPM_PEAK - DEMO_BPM_START) * ramp + 0.5) as u8
        };

        let gain = if (DEMO_RAMP_END..DEMO_VIOLENT_END).contains(&p) {
            DEMO_VIOLENT_GAIN
        } else {
            1.0
        };

        DemoSample {
            bpm,
            motion: self.motion(p, gain),
            emergency_trigger,
        }
    }

    fn motion(
        &mut self,
        p: f32,
        gain: f32,
    ) -> InertialReading {
        let wave = |cycles: f32, offset: f32| micromath::F32(TAU * p * cycles + offset).sin().0;

        let accel = Vec3::new(
            gain * (0.3 * wave(9.0, 0.0) + 0.1 * wave(23.0, 0.0)) + self.jitter(gain * ACCEL_JITTER),
            gain * (0.3 * wave(7.0, 1.0) + 0.1 * wave(17.0, 2.0)) + self.jitter(gain * ACCEL_JITTER),
            1.0 + gain * (0.25 * wave(5.0, 0.5) + 0.15 * wave(13.0, 0.0)) + self.jitter(gain * ACCEL_JITTER),
        );
        let gyro = Vec3::new(
            gain * (20.0 * wave(6.0, 0.0) + 10.0 * wave(19.0, 1.5)) + self.jitter(gain * GYRO_JITTER),
            gain * (20.0 * wave(4.0, 2.5) + 10.0 * wave(11.0, 0.0)) + self.jitter(gain * GYRO_JITTER),
            gain * (20.0 * wave(3.0, 1.0) + 10.0 * wave(29.0, 0.7)) + self.jitter(gain * GYRO_JITTER),
        );

        InertialReading { accel, gyro }
    }

    fn jitter(
        &mut self,
        amplitude: f32,
    ) -> f32 {
        self.rng.gen_range(-1.0f32..=1.0) * amplitude
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
