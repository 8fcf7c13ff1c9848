//! Command interface.
//!
//! The request router calls into [`CommandInterface`] synchronously; each
//! operation writes the actuator fields of the telemetry store and drives
//! the matching physical output before it returns, so the two never
//! disagree. Nothing here blocks.

use log::info;

use super::ports::ActuatorPort;
use crate::config::SystemConfig;
use crate::telemetry::ActuatorWriter;

/// Commands the router can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Requested fan speed, before clamping.
    SetFanSpeed(i64),
    ToggleIndicator,
    ToggleAuxOutput,
}

/// What a command actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAck {
    FanSpeed(u8),
    Indicator(bool),
    AuxOutput(bool),
}

/// Map a requested fan speed onto the 8-bit setpoint range.
///
/// Out-of-range requests clamp rather than fail, so the mapping is
/// monotonic non-decreasing over all of `i64`.
pub fn effective_fan_setpoint(requested: i64) -> u8 {
    requested.clamp(0, i64::from(u8::MAX)) as u8
}

pub struct CommandInterface<A: ActuatorPort> {
    hw: A,
    state: ActuatorWriter,
    fan_max_rpm: u32,
}

impl<A: ActuatorPort> CommandInterface<A> {
    /// Takes ownership of the actuator outputs and drives them to the
    /// values currently held in the store.
    pub fn new(config: &SystemConfig, state: ActuatorWriter, mut hw: A) -> Self {
        hw.set_fan(state.fan_setpoint());
        hw.set_indicator(state.indicator_on());
        hw.set_aux_output(state.aux_output_on());
        Self {
            hw,
            state,
            fan_max_rpm: config.fan_max_rpm,
        }
    }

    pub fn handle(&mut self, cmd: AppCommand) -> CommandAck {
        match cmd {
            AppCommand::SetFanSpeed(v) => CommandAck::FanSpeed(self.set_fan_speed(v)),
            AppCommand::ToggleIndicator => CommandAck::Indicator(self.toggle_indicator()),
            AppCommand::ToggleAuxOutput => CommandAck::AuxOutput(self.toggle_aux_output()),
        }
    }

    /// Returns the setpoint actually applied.
    pub fn set_fan_speed(&mut self, requested: i64) -> u8 {
        let setpoint = effective_fan_setpoint(requested);
        self.state.set_fan_setpoint(setpoint);
        self.hw.set_fan(setpoint);
        info!(
            "Fan setpoint {} (requested {}), ~{} RPM",
            setpoint,
            requested,
            self.estimated_rpm(setpoint)
        );
        setpoint
    }

    /// Returns the new indicator state.
    pub fn toggle_indicator(&mut self) -> bool {
        let on = !self.state.indicator_on();
        self.state.set_indicator(on);
        self.hw.set_indicator(on);
        info!("Indicator {}", if on { "ON" } else { "OFF" });
        on
    }

    /// Returns the new auxiliary output state.
    pub fn toggle_aux_output(&mut self) -> bool {
        let on = !self.state.aux_output_on();
        self.state.set_aux_output(on);
        self.hw.set_aux_output(on);
        info!("Aux output {}", if on { "ON" } else { "OFF" });
        on
    }

    /// Linear setpoint → RPM estimate; the fan has no tachometer.
    pub fn estimated_rpm(&self, setpoint: u8) -> u32 {
        u32::from(setpoint) * self.fan_max_rpm / u32::from(u8::MAX)
    }

    pub fn hw(&self) -> &A {
        &self.hw
    }
}
