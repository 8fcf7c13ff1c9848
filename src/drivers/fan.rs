//! Fan driver (logic-level MOSFET on an LEDC PWM channel).
//!
//! The 0–255 setpoint maps directly onto the 8-bit LEDC duty register,
//! so the physical drive always equals the commanded setpoint.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty via hw_init.
//! On host/test: hw_init mirrors the duty in memory.

use log::debug;

use crate::drivers::hw_init;

pub struct FanDriver {
    duty: u8,
}

impl FanDriver {
    pub fn new() -> Self {
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, 0);
        Self { duty: 0 }
    }

    /// Unchanged duty skips the register write.
    pub fn set_duty(&mut self, duty: u8) {
        if duty == self.duty {
            return;
        }
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, duty);
        debug!("Fan duty {} -> {}", self.duty, duty);
        self.duty = duty;
    }
}

impl Default for FanDriver {
    fn default() -> Self {
        Self::new()
    }
}
