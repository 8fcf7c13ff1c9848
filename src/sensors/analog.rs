//! ADC count → voltage conversion for the two analog inputs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: counts come from ADC1 CH6/CH7 via the oneshot API
//! (initialised by hw_init). On host/test: counts come from static
//! atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::config::SystemConfig;
use crate::telemetry::AnalogSample;

#[cfg(not(target_os = "espidf"))]
static SIM_COUNTS: [AtomicU16; 2] = [AtomicU16::new(0), AtomicU16::new(0)];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_counts(channel: usize, raw: u16) {
    if let Some(slot) = SIM_COUNTS.get(channel) {
        slot.store(raw, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub(crate) fn sim_counts(channel: usize) -> u16 {
    SIM_COUNTS
        .get(channel)
        .map_or(0, |slot| slot.load(Ordering::Relaxed))
}

/// Linear scale from counts to volts.
#[derive(Debug, Clone, Copy)]
pub struct AdcScale {
    reference_volts: f32,
    full_scale: f32,
}

impl AdcScale {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            reference_volts: config.adc_reference_volts,
            full_scale: f32::from(config.adc_full_scale),
        }
    }

    /// `counts * Vref / fullScale`.
    pub fn to_volts(&self, counts: u16) -> f32 {
        f32::from(counts) * self.reference_volts / self.full_scale
    }

    pub fn sample(&self, counts: u16) -> AnalogSample {
        AnalogSample {
            raw: counts,
            volts: self.to_volts(counts),
        }
    }
}
