//! Hardware adapters — bridge the drivers to the domain port traits.
//!
//! Each adapter wraps the drivers one owner needs: the analog sampler
//! gets [`AdcAdapter`], the command interface gets [`OutputAdapter`], and
//! the safety interlock gets [`AlarmAdapter`]. On non-espidf targets the
//! underlying drivers use the hw_init simulation mirror.

use crate::app::ports::{ActuatorPort, AlarmPort, AnalogPort};
use crate::drivers::fan::FanDriver;
use crate::drivers::hw_init;
use crate::drivers::outputs::DigitalOutput;

/// ADC1 oneshot reads for the two analog inputs.
#[derive(Debug, Default)]
pub struct AdcAdapter;

impl AnalogPort for AdcAdapter {
    fn read_counts(&mut self, channel: usize) -> u16 {
        hw_init::ADC1_CHANNELS
            .get(channel)
            .map_or(0, |&ch| hw_init::adc1_read(ch))
    }
}

/// Fan, indicator LED and auxiliary output.
pub struct OutputAdapter {
    fan: FanDriver,
    indicator: DigitalOutput,
    aux: DigitalOutput,
}

impl OutputAdapter {
    pub fn new(fan: FanDriver, indicator: DigitalOutput, aux: DigitalOutput) -> Self {
        Self {
            fan,
            indicator,
            aux,
        }
    }
}

impl ActuatorPort for OutputAdapter {
    fn set_fan(&mut self, setpoint: u8) {
        self.fan.set_duty(setpoint);
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator.set(on);
    }

    fn set_aux_output(&mut self, on: bool) {
        self.aux.set(on);
    }
}

/// The alarm output, owned by the interlock.
pub struct AlarmAdapter(DigitalOutput);

impl AlarmAdapter {
    pub fn new(output: DigitalOutput) -> Self {
        Self(output)
    }
}

impl AlarmPort for AlarmAdapter {
    fn set_alarm(&mut self, on: bool) {
        self.0.set(on);
    }
}
