//! Shared telemetry store.
//!
//! One in-memory record holds the latest sensor readings, actuator states,
//! and derived flags. Ownership is per field: each producer gets its own
//! write handle, and nobody else can obtain one.
//!
//! ```text
//!  AnalogWriter ────┐
//!  ClimateWriter ───┤   ┌───────────────────────────┐
//!  InterlockWriter ─┼──▶│ Mutex<Cell<TelemetryState>>│──▶ TelemetryReader (Clone)
//!  ActuatorWriter ──┘   └───────────────────────────┘
//! ```
//!
//! Every access copies the whole record in or out under one critical
//! section, so a reader never sees half of a multi-field group (the
//! temperature/humidity pair, one channel's raw+volts pair).

use core::cell::Cell;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::Serialize;

/// Number of analog input channels sampled by the analog task.
pub const ANALOG_CHANNELS: usize = 2;

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One analog channel: raw ADC counts and the derived voltage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalogSample {
    pub raw: u16,
    pub volts: f32,
}

/// Temperature and humidity from one climate sensor read cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl ClimateReading {
    /// "No valid reading": both fields NaN.
    pub const INVALID: Self = Self {
        temperature_c: f32::NAN,
        humidity_pct: f32::NAN,
    };

    pub fn is_valid(&self) -> bool {
        !self.temperature_c.is_nan() && !self.humidity_pct.is_nan()
    }
}

/// The single shared record.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryState {
    /// Analog channels 0/1. Written by the analog sampler.
    pub analog: [AnalogSample; ANALOG_CHANNELS],
    /// Monotonic time of the last analog sample (µs). Analog sampler.
    pub last_sample_us: Option<u64>,
    /// Fan setpoint 0..=255. Command interface.
    pub fan_setpoint: u8,
    /// Indicator LED. Command interface.
    pub indicator_on: bool,
    /// Auxiliary output. Command interface.
    pub aux_output_on: bool,
    /// Temperature/humidity pair. Climate sampler.
    pub climate: ClimateReading,
    /// Interlock is in Emergency. Safety interlock.
    pub emergency_active: bool,
    /// Tasks that have executed at least once. Never decremented.
    pub live_task_count: u8,
}

impl TelemetryState {
    const BOOT: Self = Self {
        analog: [AnalogSample { raw: 0, volts: 0.0 }; ANALOG_CHANNELS],
        last_sample_us: None,
        fan_setpoint: 0,
        indicator_on: false,
        aux_output_on: false,
        climate: ClimateReading::INVALID,
        emergency_active: false,
        live_task_count: 0,
    };
}

impl Default for TelemetryState {
    fn default() -> Self {
        Self::BOOT
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

struct Shared {
    state: Mutex<CriticalSectionRawMutex, Cell<TelemetryState>>,
}

impl Shared {
    fn read(&self) -> TelemetryState {
        self.state.lock(Cell::get)
    }

    fn update(&self, f: impl FnOnce(&mut TelemetryState)) {
        self.state.lock(|cell| {
            let mut s = cell.get();
            f(&mut s);
            cell.set(s);
        });
    }
}

/// All handles onto a freshly created store.
///
/// Writers are not `Clone`: each one is moved into the single task that
/// owns its fields. The reader can be cloned freely.
pub struct TelemetryHandles {
    pub reader: TelemetryReader,
    pub analog: AnalogWriter,
    pub climate: ClimateWriter,
    pub interlock: InterlockWriter,
    pub actuators: ActuatorWriter,
    shared: Arc<Shared>,
}

impl TelemetryHandles {
    /// Create the store with boot defaults (zeros, invalid climate,
    /// Normal interlock). Lives for the rest of the process.
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(Cell::new(TelemetryState::BOOT)),
        });
        Self {
            reader: TelemetryReader(shared.clone()),
            analog: AnalogWriter(shared.clone()),
            climate: ClimateWriter(shared.clone()),
            interlock: InterlockWriter(shared.clone()),
            actuators: ActuatorWriter(shared.clone()),
            shared,
        }
    }

    /// A liveness token for one task. Hand exactly one to each task.
    pub fn liveness_token(&self) -> LivenessToken {
        LivenessToken {
            shared: self.shared.clone(),
            announced: false,
        }
    }
}

impl Default for TelemetryHandles {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view used by the status reporter and the command layer.
#[derive(Clone)]
pub struct TelemetryReader(Arc<Shared>);

impl TelemetryReader {
    /// Consistent point-in-time copy of the whole record.
    pub fn snapshot(&self) -> TelemetryState {
        self.0.read()
    }
}

/// Write handle for the analog channels and the sample timestamp.
pub struct AnalogWriter(Arc<Shared>);

impl AnalogWriter {
    /// Publish both channels and the sample time in one update.
    pub fn publish(&self, samples: [AnalogSample; ANALOG_CHANNELS], at_us: u64) {
        self.0.update(|s| {
            s.analog = samples;
            s.last_sample_us = Some(at_us);
        });
    }

    pub fn last_sample_us(&self) -> Option<u64> {
        self.0.read().last_sample_us
    }
}

/// Write handle for the temperature/humidity pair.
pub struct ClimateWriter(Arc<Shared>);

impl ClimateWriter {
    pub fn publish(&self, reading: ClimateReading) {
        self.0.update(|s| s.climate = reading);
    }
}

/// Write handle for the emergency flag.
pub struct InterlockWriter(Arc<Shared>);

impl InterlockWriter {
    pub fn set_emergency(&self, active: bool) {
        self.0.update(|s| s.emergency_active = active);
    }
}

/// Write handle for the actuator fields.
pub struct ActuatorWriter(Arc<Shared>);

impl ActuatorWriter {
    pub fn set_fan_setpoint(&self, value: u8) {
        self.0.update(|s| s.fan_setpoint = value);
    }

    pub fn set_indicator(&self, on: bool) {
        self.0.update(|s| s.indicator_on = on);
    }

    pub fn set_aux_output(&self, on: bool) {
        self.0.update(|s| s.aux_output_on = on);
    }

    pub fn fan_setpoint(&self) -> u8 {
        self.0.read().fan_setpoint
    }

    pub fn indicator_on(&self) -> bool {
        self.0.read().indicator_on
    }

    pub fn aux_output_on(&self) -> bool {
        self.0.read().aux_output_on
    }
}

/// Bumps `live_task_count` once, the first time its task runs.
pub struct LivenessToken {
    shared: Arc<Shared>,
    announced: bool,
}

impl LivenessToken {
    /// Returns `true` only on the call that bumped the counter.
    pub fn mark_started(&mut self) -> bool {
        if self.announced {
            return false;
        }
        self.announced = true;
        self.shared
            .update(|s| s.live_task_count = s.live_task_count.saturating_add(1));
        true
    }
}
