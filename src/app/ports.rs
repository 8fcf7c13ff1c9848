//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ samplers / interlock / command interface
//! ```
//!
//! Driven adapters (ADC, climate sensor, ranger, actuators, event sinks,
//! clocks) implement these traits. The domain code consumes them via
//! generics, so nothing above this line touches hardware directly.

use crate::drivers::task_pin::Core;
use crate::error::SensorError;
use crate::telemetry::ClimateReading;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw analog inputs.
pub trait AnalogPort {
    /// Read raw ADC counts from `channel` (0 or 1).
    fn read_counts(&mut self, channel: usize) -> u16;
}

/// Temperature/humidity sensor. One call is one physical read cycle.
pub trait ClimatePort {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError>;
}

/// Ultrasonic ranger. Must return within a bounded time:
/// a missing echo is `Err(SensorError::EchoTimeout)`.
pub trait RangingPort {
    fn measure_distance_cm(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Outputs owned by the command interface.
pub trait ActuatorPort {
    /// Drive the fan at `setpoint` (0–255), mapped to native duty.
    fn set_fan(&mut self, setpoint: u8);

    /// Drive the indicator LED.
    fn set_indicator(&mut self, on: bool);

    /// Drive the auxiliary output.
    fn set_aux_output(&mut self, on: bool);
}

/// The audible alarm. Owned by the safety interlock.
pub trait AlarmPort {
    fn set_alarm(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time and scheduler ports
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock.
pub trait TimePort {
    fn now_us(&self) -> u64;
}

/// Coarse view of the scheduler: is any of our work placed on `core`?
pub trait SchedulerProbe {
    fn core_active(&self, core: Core) -> bool;
}
