//! Actuator drivers, hardware initialisation, and task placement.

pub mod fan;
pub mod hw_init;
pub mod outputs;
pub mod task_pin;
