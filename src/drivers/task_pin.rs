//! Core-pinned thread spawning for the ESP32 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to plain thread spawn.
//!
//! Every spawned task is counted against its core while its body runs;
//! [`PinnedTaskProbe`] exposes those counts as the per-core liveness
//! flags in the status report.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread. This means the config→spawn pair must not be
//! interleaved with other thread creation on the same thread.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::ports::SchedulerProbe;

/// CPU core identifiers for the ESP32 Xtensa LX6 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU) — protocol stacks (WiFi, lwIP, httpd).
    Pro = 0,
    /// Core 1 (APP_CPU) — sampling and safety-critical logic.
    App = 1,
}

impl Core {
    const fn index(self) -> usize {
        self as usize
    }
}

/// Running tasks per core, indexed by `Core as usize`.
static CORE_TASKS: [AtomicU8; 2] = [AtomicU8::new(0), AtomicU8::new(0)];

/// Decrements its core's count when the task body returns or unwinds.
struct CoreSlot(Core);

impl CoreSlot {
    fn claim(core: Core) -> Self {
        CORE_TASKS[core.index()].fetch_add(1, Ordering::AcqRel);
        Self(core)
    }
}

impl Drop for CoreSlot {
    fn drop(&mut self) {
        CORE_TASKS[self.0.index()].fetch_sub(1, Ordering::AcqRel);
    }
}

/// Number of our tasks currently running on `core`.
pub fn tasks_on(core: Core) -> u8 {
    CORE_TASKS[core.index()].load(Ordering::Acquire)
}

/// [`SchedulerProbe`] backed by the spawn registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinnedTaskProbe;

impl SchedulerProbe for PinnedTaskProbe {
    fn core_active(&self, core: Core) -> bool {
        tasks_on(core) > 0
    }
}

/// Spawn a thread pinned to a specific core with explicit priority and stack.
///
/// On ESP-IDF, uses `esp_pthread_set_cfg()` to configure core affinity,
/// priority, and stack size before `std::thread::spawn`. The `name` parameter
/// must be a null-terminated string (e.g. `"ranging\0"`).
///
/// On non-ESP targets, ignores `core` and `priority`, using only `stack_kb`.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    // SAFETY: the config struct is fully initialised by the default
    // constructor and outlives the call; `name` is a 'static C string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = priority as i32;
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(std::io::Error::other(format!(
            "esp_pthread_set_cfg failed: {ret}"
        )));
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        core,
        priority,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(move || {
            let _slot = CoreSlot::claim(core);
            f();
        })
}

/// Simulation fallback — ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(move || {
            let _slot = CoreSlot::claim(core);
            f();
        })
}
