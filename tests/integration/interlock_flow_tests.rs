//! Ranging sampler → safety interlock → telemetry → status report.

use crate::mock_hw::{FixedProbe, MockAlarm, RecordingSink, ScriptedRanger};

use supermon::app::events::AppEvent;
use supermon::app::status::StatusReporter;
use supermon::config::{EchoTimeoutPolicy, SystemConfig};
use supermon::error::SensorError;
use supermon::interlock::{InterlockState, SafetyInterlock};
use supermon::tasks::RangingSampler;
use supermon::telemetry::TelemetryHandles;

struct Rig {
    sampler: RangingSampler<ScriptedRanger, MockAlarm, RecordingSink>,
    ranger: ScriptedRanger,
    alarm: MockAlarm,
    reporter: StatusReporter<FixedProbe>,
}

fn rig(config: &SystemConfig) -> Rig {
    let h = TelemetryHandles::new();
    let token = h.liveness_token();
    let ranger = ScriptedRanger::default();
    let alarm = MockAlarm::default();
    let safety = SafetyInterlock::new(config, h.interlock, alarm.clone(), RecordingSink::default());
    Rig {
        sampler: RangingSampler::new(config, ranger.clone(), safety, token),
        ranger,
        alarm,
        reporter: StatusReporter::new(h.reader, FixedProbe::default()),
    }
}

fn emergency_tag(r: &Rig) -> String {
    let xml = r.reporter.report().render_xml().unwrap();
    let start = xml.find("<EMERGENCY_MODE>").unwrap();
    xml[start..start + "<EMERGENCY_MODE>0</EMERGENCY_MODE>".len()].to_string()
}

#[test]
fn obstacle_approach_and_retreat_round_trip() {
    let mut r = rig(&SystemConfig::default());
    let mut alarm_seen = Vec::new();
    let mut states = Vec::new();
    let mut tags = Vec::new();

    for d in [25.0, 15.0, 25.0] {
        r.ranger.push(Ok(d));
        r.sampler.step();
        states.push(r.sampler.interlock().state());
        alarm_seen.push(r.alarm.is_on());
        tags.push(emergency_tag(&r));
    }

    assert_eq!(
        states,
        [
            InterlockState::Normal,
            InterlockState::Emergency,
            InterlockState::Normal
        ]
    );
    assert_eq!(alarm_seen, [false, true, false]);
    assert_eq!(
        tags,
        [
            "<EMERGENCY_MODE>0</EMERGENCY_MODE>",
            "<EMERGENCY_MODE>1</EMERGENCY_MODE>",
            "<EMERGENCY_MODE>0</EMERGENCY_MODE>"
        ]
    );
}

#[test]
fn steady_obstacle_fires_alarm_once() {
    let mut r = rig(&SystemConfig::default());
    for d in (5..=40).rev() {
        r.ranger.push(Ok(d as f32));
    }
    for _ in 5..=40 {
        r.sampler.step();
    }

    assert_eq!(r.alarm.activations(), 1);
    assert_eq!(r.alarm.history.borrow().len(), 1);
    let entered = r
        .sampler
        .interlock()
        .sink()
        .count(|e| matches!(e, AppEvent::EmergencyEntered { .. }));
    assert_eq!(entered, 1);
}

#[test]
fn lost_echo_trips_under_failsafe() {
    let mut r = rig(&SystemConfig::default());
    r.ranger.push(Ok(80.0));
    r.sampler.step();

    // Script exhausted: every further measurement times out.
    for _ in 0..3 {
        r.sampler.step();
    }
    assert!(r.reporter.report().emergency_active);
    assert!(r.alarm.is_on());

    r.ranger.push(Ok(80.0));
    r.sampler.step();
    assert!(!r.reporter.report().emergency_active);
    assert!(!r.alarm.is_on());
}

#[test]
fn lost_echo_is_clear_under_assume_clear() {
    let mut cfg = SystemConfig::default();
    cfg.echo_timeout_policy = EchoTimeoutPolicy::AssumeClear;
    let mut r = rig(&cfg);

    for _ in 0..10 {
        r.sampler.step();
    }
    assert!(!r.reporter.report().emergency_active);

    r.ranger.push(Ok(3.0));
    r.sampler.step();
    assert!(r.alarm.is_on());
    r.ranger.push(Err(SensorError::EchoTimeout));
    r.sampler.step();
    assert!(!r.alarm.is_on());
}
