//! SuperMon firmware library.
//!
//! Sensor sampling, the proximity safety interlock, the command
//! interface and the status reporter, plus the adapters that bind them
//! to ESP32 peripherals. Everything outside `#[cfg(target_os = "espidf")]`
//! builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod interlock;
pub mod pins;
pub mod sensors;
pub mod tasks;
pub mod telemetry;
