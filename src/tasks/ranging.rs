//! Ranging sampler: one ultrasonic measurement per tick, fed straight
//! into the safety interlock.
//!
//! This task owns the ranger's trigger and echo pins and the interlock's
//! outputs. The echo wait is bounded by the driver, so a missing echo
//! costs at most `echo_timeout_us` of the tick.

use log::{trace, warn};

use super::{RANGING_TASK, run_periodic};
use crate::app::events::AppEvent;
use crate::app::ports::{AlarmPort, EventSink, RangingPort};
use crate::config::SystemConfig;
use crate::error::SensorError;
use crate::interlock::{RangeObservation, SafetyInterlock, Transition};
use crate::telemetry::LivenessToken;

pub struct RangingSampler<R: RangingPort, A: AlarmPort, S: EventSink> {
    ranger: R,
    interlock: SafetyInterlock<A, S>,
    liveness: LivenessToken,
    period_ms: u32,
}

impl<R: RangingPort, A: AlarmPort, S: EventSink> RangingSampler<R, A, S> {
    pub fn new(
        config: &SystemConfig,
        ranger: R,
        interlock: SafetyInterlock<A, S>,
        liveness: LivenessToken,
    ) -> Self {
        Self {
            ranger,
            interlock,
            liveness,
            period_ms: config.ranging_task_period_ms,
        }
    }

    /// One measurement and one interlock evaluation.
    pub fn step(&mut self) -> Option<Transition> {
        if self.liveness.mark_started() {
            self.interlock
                .sink_mut()
                .emit(&AppEvent::TaskStarted(RANGING_TASK.label()));
        }

        let observation = match self.ranger.measure_distance_cm() {
            Ok(cm) => {
                trace!("Distance {cm:.1} cm");
                RangeObservation::Distance(cm)
            }
            Err(SensorError::EchoTimeout) => RangeObservation::EchoTimeout,
            Err(e) => {
                // No usable distance this tick; same standing as a lost echo.
                warn!("Ranging failed: {e}");
                RangeObservation::EchoTimeout
            }
        };
        self.interlock.observe(observation)
    }

    pub fn interlock(&self) -> &SafetyInterlock<A, S> {
        &self.interlock
    }

    pub fn run(mut self) -> ! {
        let period = self.period_ms;
        run_periodic(period, || {
            self.step();
        })
    }
}
