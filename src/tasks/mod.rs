//! Periodic sampler tasks.
//!
//! Each sampler is a plain struct with a `step()` that performs one
//! iteration and a `run()` that loops forever, sleeping a fixed period
//! after every step. `step()` is what the tests drive.
//!
//! | Task     | Core | Priority | Period  |
//! |----------|------|----------|---------|
//! | ranging  | App  | high     | 100 ms  |
//! | analog   | App  | medium   | 10 ms (50 ms guard) |
//! | climate  | Pro  | low      | 100 ms  |
//!
//! The ranging task feeds the safety interlock, so it outranks the
//! telemetry samplers on the core it shares with them. The climate task
//! sits on the protocol core next to Wi-Fi and the HTTP server.

pub mod analog;
pub mod climate;
pub mod ranging;

use std::thread::JoinHandle;
use std::time::Duration;

use log::error;

use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::error::{Error, Result};

pub use analog::AnalogSampler;
pub use climate::ClimateSampler;
pub use ranging::RangingSampler;

/// Placement of one task. `name` must be null-terminated.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    /// `name` without the terminator, for logs and events.
    pub fn label(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }

    pub fn spawn(&self, f: impl FnOnce() + Send + 'static) -> Result<JoinHandle<()>> {
        spawn_on_core(self.core, self.priority, self.stack_kb, self.name, f).map_err(|e| {
            error!("Failed to spawn '{}': {e}", self.label());
            Error::Spawn(self.label())
        })
    }
}

pub const RANGING_TASK: TaskSpec = TaskSpec {
    name: "ranging\0",
    core: Core::App,
    priority: 10,
    stack_kb: 4,
};

pub const ANALOG_TASK: TaskSpec = TaskSpec {
    name: "analog\0",
    core: Core::App,
    priority: 5,
    stack_kb: 4,
};

pub const CLIMATE_TASK: TaskSpec = TaskSpec {
    name: "climate\0",
    core: Core::Pro,
    priority: 3,
    stack_kb: 6,
};

/// Run `step` forever with a fixed sleep after each iteration.
pub(crate) fn run_periodic(period_ms: u32, mut step: impl FnMut()) -> ! {
    let period = Duration::from_millis(u64::from(period_ms));
    loop {
        step();
        std::thread::sleep(period);
    }
}
