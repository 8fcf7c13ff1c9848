//! Safety interlock.
//!
//! A two-state machine fed once per ranging tick:
//!
//! ```text
//!            distance < threshold
//!   Normal ───────────────────────▶ Emergency
//!          ◀───────────────────────
//!     distance >= threshold + release margin
//! ```
//!
//! Side effects (emergency flag, alarm output, shutdown notification) run
//! only on an edge. Re-evaluating in a settled state does nothing.
//!
//! ## Echo timeouts
//!
//! Under [`EchoTimeoutPolicy::FailSafe`] a single timeout holds the current
//! state; `echo_timeouts_before_trip` consecutive timeouts trip the
//! interlock. Under [`EchoTimeoutPolicy::AssumeClear`] a timeout reads as
//! a clear path.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{AlarmPort, EventSink};
use crate::config::{EchoTimeoutPolicy, SystemConfig};
use crate::telemetry::InterlockWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterlockState {
    #[default]
    Normal,
    Emergency,
}

/// What the ranging sampler saw this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeObservation {
    Distance(f32),
    EchoTimeout,
}

/// An edge of the state machine. `None` distances come from timeouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Tripped { distance_cm: Option<f32> },
    Released { distance_cm: Option<f32> },
}

/// Pure transition logic, no I/O.
#[derive(Debug, Clone)]
pub struct Interlock {
    state: InterlockState,
    threshold_cm: f32,
    release_margin_cm: f32,
    policy: EchoTimeoutPolicy,
    timeouts_before_trip: u8,
    consecutive_timeouts: u8,
}

impl Interlock {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: InterlockState::Normal,
            threshold_cm: config.emergency_distance_cm,
            release_margin_cm: config.release_margin_cm,
            policy: config.echo_timeout_policy,
            timeouts_before_trip: config.echo_timeouts_before_trip,
            consecutive_timeouts: 0,
        }
    }

    pub fn state(&self) -> InterlockState {
        self.state
    }

    /// Feed one observation; returns the edge it caused, if any.
    pub fn evaluate(&mut self, observation: RangeObservation) -> Option<Transition> {
        match observation {
            RangeObservation::Distance(d) => {
                // Only a real measurement ends a run of timeouts.
                if d.is_finite() {
                    self.consecutive_timeouts = 0;
                }
                match self.state {
                    InterlockState::Normal if d < self.threshold_cm => self.trip(Some(d)),
                    InterlockState::Emergency
                        if d >= self.threshold_cm + self.release_margin_cm =>
                    {
                        self.release(Some(d))
                    }
                    _ => None,
                }
            }
            RangeObservation::EchoTimeout => {
                self.consecutive_timeouts = self.consecutive_timeouts.saturating_add(1);
                match (self.policy, self.state) {
                    (EchoTimeoutPolicy::AssumeClear, InterlockState::Emergency) => {
                        self.release(None)
                    }
                    (EchoTimeoutPolicy::FailSafe, InterlockState::Normal)
                        if self.consecutive_timeouts >= self.timeouts_before_trip =>
                    {
                        self.trip(None)
                    }
                    _ => None,
                }
            }
        }
    }

    fn trip(&mut self, distance_cm: Option<f32>) -> Option<Transition> {
        self.state = InterlockState::Emergency;
        Some(Transition::Tripped { distance_cm })
    }

    fn release(&mut self, distance_cm: Option<f32>) -> Option<Transition> {
        self.state = InterlockState::Normal;
        Some(Transition::Released { distance_cm })
    }
}

// ───────────────────────────────────────────────────────────────
// Side effects
// ───────────────────────────────────────────────────────────────

/// [`Interlock`] plus the outputs it owns: the emergency flag, the alarm,
/// and the event sink for the shutdown notification.
pub struct SafetyInterlock<A: AlarmPort, S: EventSink> {
    machine: Interlock,
    flag: InterlockWriter,
    alarm: A,
    sink: S,
}

impl<A: AlarmPort, S: EventSink> SafetyInterlock<A, S> {
    pub fn new(config: &SystemConfig, flag: InterlockWriter, alarm: A, sink: S) -> Self {
        Self {
            machine: Interlock::new(config),
            flag,
            alarm,
            sink,
        }
    }

    pub fn state(&self) -> InterlockState {
        self.machine.state()
    }

    /// Evaluate one observation and apply the edge's side effects.
    pub fn observe(&mut self, observation: RangeObservation) -> Option<Transition> {
        if observation == RangeObservation::EchoTimeout {
            warn!("Ranging: echo timeout");
        }
        let transition = self.machine.evaluate(observation)?;
        match transition {
            Transition::Tripped { distance_cm } => {
                self.flag.set_emergency(true);
                self.alarm.set_alarm(true);
                self.notify_shutdown(distance_cm);
            }
            Transition::Released { distance_cm } => {
                self.flag.set_emergency(false);
                self.alarm.set_alarm(false);
                info!("INTERLOCK RELEASED (distance={distance_cm:?} cm), alarm off");
                self.sink.emit(&AppEvent::EmergencyCleared { distance_cm });
            }
        }
        Some(transition)
    }

    fn notify_shutdown(&mut self, distance_cm: Option<f32>) {
        match distance_cm {
            Some(d) => error!("EMERGENCY: obstacle at {d:.1} cm, alarm on, shutting down"),
            None => error!("EMERGENCY: ranger not answering, alarm on, shutting down"),
        }
        self.sink.emit(&AppEvent::EmergencyEntered { distance_cm });
    }

    pub(crate) fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The alarm adapter, for inspection in tests.
    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    /// The event sink, for inspection in tests.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(d: f32) -> RangeObservation {
        RangeObservation::Distance(d)
    }

    fn count_edges(machine: &mut Interlock, seq: &[RangeObservation]) -> (usize, usize) {
        seq.iter().fold((0, 0), |(t, r), obs| match machine.evaluate(*obs) {
            Some(Transition::Tripped { .. }) => (t + 1, r),
            Some(Transition::Released { .. }) => (t, r + 1),
            None => (t, r),
        })
    }

    #[test]
    fn starts_normal() {
        assert_eq!(
            Interlock::new(&SystemConfig::default()).state(),
            InterlockState::Normal
        );
    }

    #[test]
    fn trips_and_releases_on_threshold() {
        let mut m = Interlock::new(&SystemConfig::default());
        assert_eq!(m.evaluate(distance(25.0)), None);
        assert_eq!(
            m.evaluate(distance(15.0)),
            Some(Transition::Tripped {
                distance_cm: Some(15.0)
            })
        );
        assert_eq!(m.evaluate(distance(10.0)), None);
        // Exactly at threshold releases.
        assert_eq!(
            m.evaluate(distance(20.0)),
            Some(Transition::Released {
                distance_cm: Some(20.0)
            })
        );
    }

    #[test]
    fn decreasing_sequence_trips_once() {
        let mut m = Interlock::new(&SystemConfig::default());
        let seq: Vec<_> = (0..40).rev().map(|d| distance(d as f32)).collect();
        assert_eq!(count_edges(&mut m, &seq), (1, 0));
    }

    #[test]
    fn oscillation_fires_once_per_crossing() {
        let mut m = Interlock::new(&SystemConfig::default());
        let seq = [25.0, 19.9, 19.0, 20.0, 21.0, 19.5, 30.0]
            .map(distance);
        assert_eq!(count_edges(&mut m, &seq), (2, 2));
    }

    #[test]
    fn release_margin_adds_hysteresis() {
        let mut cfg = SystemConfig::default();
        cfg.release_margin_cm = 5.0;
        let mut m = Interlock::new(&cfg);
        m.evaluate(distance(10.0));
        assert_eq!(m.evaluate(distance(22.0)), None);
        assert_eq!(m.state(), InterlockState::Emergency);
        assert!(m.evaluate(distance(25.0)).is_some());
    }

    #[test]
    fn failsafe_trips_after_consecutive_timeouts() {
        let mut m = Interlock::new(&SystemConfig::default());
        assert_eq!(m.evaluate(RangeObservation::EchoTimeout), None);
        assert_eq!(m.evaluate(RangeObservation::EchoTimeout), None);
        assert_eq!(
            m.evaluate(RangeObservation::EchoTimeout),
            Some(Transition::Tripped { distance_cm: None })
        );
    }

    #[test]
    fn valid_reading_resets_timeout_run() {
        let mut m = Interlock::new(&SystemConfig::default());
        let seq = [
            RangeObservation::EchoTimeout,
            RangeObservation::EchoTimeout,
            distance(50.0),
            RangeObservation::EchoTimeout,
            RangeObservation::EchoTimeout,
        ];
        assert_eq!(count_edges(&mut m, &seq), (0, 0));
    }

    #[test]
    fn failsafe_timeout_holds_emergency() {
        let mut m = Interlock::new(&SystemConfig::default());
        m.evaluate(distance(5.0));
        assert_eq!(m.evaluate(RangeObservation::EchoTimeout), None);
        assert_eq!(m.state(), InterlockState::Emergency);
    }

    #[test]
    fn assume_clear_timeout_releases() {
        let mut cfg = SystemConfig::default();
        cfg.echo_timeout_policy = EchoTimeoutPolicy::AssumeClear;
        let mut m = Interlock::new(&cfg);
        for _ in 0..5 {
            assert_eq!(m.evaluate(RangeObservation::EchoTimeout), None);
        }
        m.evaluate(distance(5.0));
        assert_eq!(
            m.evaluate(RangeObservation::EchoTimeout),
            Some(Transition::Released { distance_cm: None })
        );
    }

    #[test]
    fn nan_distance_holds_state() {
        let mut m = Interlock::new(&SystemConfig::default());
        assert_eq!(m.evaluate(distance(f32::NAN)), None);
        m.evaluate(distance(5.0));
        assert_eq!(m.evaluate(distance(f32::NAN)), None);
        assert_eq!(m.state(), InterlockState::Emergency);
    }

    #[test]
    fn nan_distance_does_not_reset_timeout_run() {
        let mut m = Interlock::new(&SystemConfig::default());
        assert_eq!(m.evaluate(RangeObservation::EchoTimeout), None);
        assert_eq!(m.evaluate(RangeObservation::EchoTimeout), None);
        assert_eq!(m.evaluate(distance(f32::NAN)), None);
        assert_eq!(
            m.evaluate(RangeObservation::EchoTimeout),
            Some(Transition::Tripped { distance_cm: None })
        );
    }
}
