//! Mock adapters for integration tests.
//!
//! Records every actuator, alarm and event call so tests can assert on
//! the full history without touching GPIO/PWM registers.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use supermon::app::events::AppEvent;
use supermon::app::ports::{
    ActuatorPort, AlarmPort, ClimatePort, EventSink, RangingPort, SchedulerProbe, TimePort,
};
use supermon::drivers::task_pin::Core;
use supermon::error::SensorError;
use supermon::telemetry::ClimateReading;

// ── Actuators ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Fan(u8),
    Indicator(bool),
    AuxOutput(bool),
}

#[derive(Default)]
pub struct MockOutputs {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockOutputs {
    pub fn fan(&self) -> u8 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Fan(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn indicator(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Indicator(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl ActuatorPort for MockOutputs {
    fn set_fan(&mut self, setpoint: u8) {
        self.calls.push(ActuatorCall::Fan(setpoint));
    }

    fn set_indicator(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Indicator(on));
    }

    fn set_aux_output(&mut self, on: bool) {
        self.calls.push(ActuatorCall::AuxOutput(on));
    }
}

// ── Alarm ─────────────────────────────────────────────────────

/// Shares its history so the test can read it after the alarm has been
/// moved into the interlock.
#[derive(Clone, Default)]
pub struct MockAlarm {
    pub history: Rc<std::cell::RefCell<Vec<bool>>>,
}

#[allow(dead_code)]
impl MockAlarm {
    pub fn is_on(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }

    pub fn activations(&self) -> usize {
        self.history.borrow().iter().filter(|on| **on).count()
    }
}

impl AlarmPort for MockAlarm {
    fn set_alarm(&mut self, on: bool) {
        self.history.borrow_mut().push(on);
    }
}

// ── Events ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Sensors ───────────────────────────────────────────────────

/// Plays back distances; shared so tests can push readings mid-run.
#[derive(Clone, Default)]
pub struct ScriptedRanger {
    pub script: Rc<std::cell::RefCell<VecDeque<Result<f32, SensorError>>>>,
}

#[allow(dead_code)]
impl ScriptedRanger {
    pub fn push(&self, reading: Result<f32, SensorError>) {
        self.script.borrow_mut().push_back(reading);
    }
}

impl RangingPort for ScriptedRanger {
    fn measure_distance_cm(&mut self) -> Result<f32, SensorError> {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(SensorError::EchoTimeout))
    }
}

pub struct ScriptedClimate(pub VecDeque<Result<ClimateReading, SensorError>>);

impl ClimatePort for ScriptedClimate {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.0.pop_front().unwrap_or(Err(SensorError::NoResponse))
    }
}

// ── Time / scheduler ──────────────────────────────────────────

#[derive(Clone, Default)]
pub struct ManualClock(pub Rc<Cell<u64>>);

#[allow(dead_code)]
impl ManualClock {
    pub fn advance_ms(&self, ms: u64) {
        self.0.set(self.0.get() + ms * 1000);
    }
}

impl TimePort for ManualClock {
    fn now_us(&self) -> u64 {
        self.0.get()
    }
}

#[derive(Clone, Copy, Default)]
pub struct FixedProbe {
    pub core0: bool,
    pub core1: bool,
}

impl SchedulerProbe for FixedProbe {
    fn core_active(&self, core: Core) -> bool {
        match core {
            Core::Pro => self.core0,
            Core::App => self.core1,
        }
    }
}
