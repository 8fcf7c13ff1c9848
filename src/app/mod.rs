//! Application core — domain logic behind port traits.
//!
//! The command interface, status reporter and request router live here.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod router;
pub mod status;
