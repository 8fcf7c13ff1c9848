//! Sensor drivers.
//!
//! Each driver implements one of the sensor ports in
//! [`app::ports`](crate::app::ports) and is owned by exactly one sampler
//! task. The ranger and the climate sensor are generic over
//! `embedded-hal` pins and delays, so the same code runs against
//! `esp-idf-hal` drivers on target and simulated pins in tests.

pub mod analog;
pub mod dht;
pub mod hcsr04;

pub use analog::AdcScale;
pub use dht::{Dht, DhtModel};
pub use hcsr04::Hcsr04;
