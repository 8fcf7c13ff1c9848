//! Plain on/off GPIO outputs: indicator LED, auxiliary switch, alarm.
//!
//! Each output is a tiny owned driver; whoever holds it is the only
//! writer of that pin. The alarm belongs to the safety interlock, the
//! other two to the command interface.

use crate::drivers::hw_init;
use crate::pins;

pub struct DigitalOutput {
    gpio: i32,
    on: bool,
}

impl DigitalOutput {
    /// Claim `gpio` and drive it low.
    pub fn new(gpio: i32) -> Self {
        hw_init::gpio_write(gpio, false);
        Self { gpio, on: false }
    }

    pub fn indicator() -> Self {
        Self::new(pins::INDICATOR_LED_GPIO)
    }

    pub fn aux_output() -> Self {
        Self::new(pins::AUX_OUTPUT_GPIO)
    }

    pub fn alarm() -> Self {
        Self::new(pins::ALARM_GPIO)
    }

    /// Writes the pin only when the level changes.
    pub fn set(&mut self, on: bool) {
        if on != self.on {
            hw_init::gpio_write(self.gpio, on);
            self.on = on;
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn alarm_drives_its_pin() {
        let mut alarm = DigitalOutput::alarm();
        assert!(!hw_init::sim_gpio_level(pins::ALARM_GPIO));
        alarm.set(true);
        alarm.set(true);
        assert!(hw_init::sim_gpio_level(pins::ALARM_GPIO));
        alarm.set(false);
        assert!(!hw_init::sim_gpio_level(pins::ALARM_GPIO));
    }
}
