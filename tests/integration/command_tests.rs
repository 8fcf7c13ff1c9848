//! Router → command interface → actuators and telemetry.

use crate::mock_hw::{ActuatorCall, FixedProbe, MockOutputs};

use supermon::app::commands::CommandInterface;
use supermon::app::router::Router;
use supermon::app::status::StatusReporter;
use supermon::config::SystemConfig;
use supermon::telemetry::{TelemetryHandles, TelemetryReader};

fn router() -> (Router<MockOutputs, FixedProbe>, TelemetryReader) {
    let h = TelemetryHandles::new();
    let cmd = CommandInterface::new(&SystemConfig::default(), h.actuators, MockOutputs::default());
    let probe = FixedProbe {
        core0: true,
        core1: true,
    };
    let reporter = StatusReporter::new(h.reader.clone(), probe);
    (Router::new(cmd, reporter), h.reader)
}

#[test]
fn out_of_range_slider_reports_clamped_value() {
    let (mut r, reader) = router();
    let resp = r.handle("/UPDATE_SLIDER?VALUE=300");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "255");
    assert_eq!(reader.snapshot().fan_setpoint, 255);
    assert_eq!(r.commands().hw().fan(), 255);
}

#[test]
fn negative_slider_clamps_to_zero() {
    let (mut r, reader) = router();
    r.handle("/UPDATE_SLIDER?VALUE=120");
    assert_eq!(r.handle("/UPDATE_SLIDER?VALUE=-4").body, "0");
    assert_eq!(reader.snapshot().fan_setpoint, 0);
    assert_eq!(r.commands().hw().fan(), 0);
}

#[test]
fn double_toggle_leaves_indicator_unchanged() {
    let (mut r, reader) = router();
    let before_state = reader.snapshot().indicator_on;
    let before_pin = r.commands().hw().indicator();

    let first = r.handle("/BUTTON_0");
    assert_eq!(first.status, 200);
    assert!(first.body.is_empty());
    assert!(reader.snapshot().indicator_on);
    r.handle("/BUTTON_0");

    assert_eq!(reader.snapshot().indicator_on, before_state);
    assert_eq!(r.commands().hw().indicator(), before_pin);
}

#[test]
fn aux_toggle_drives_output() {
    let (mut r, reader) = router();
    r.handle("/BUTTON_1");
    assert!(reader.snapshot().aux_output_on);
    assert_eq!(
        r.commands().hw().calls.last(),
        Some(&ActuatorCall::AuxOutput(true))
    );
}

#[test]
fn serves_page_and_status() {
    let (mut r, _) = router();
    let page = r.handle("/");
    assert_eq!(page.content_type, "text/html");
    assert!(page.body.contains("/xml"));

    r.handle("/BUTTON_0");
    let xml = r.handle("/xml");
    assert_eq!(xml.content_type, "text/xml");
    assert!(xml.body.starts_with("<?xml version='1.0'?>"));
    assert!(xml.body.contains("<LED>1</LED>"));
    assert!(xml.body.contains("<CORE0_STATUS>1</CORE0_STATUS>"));

    let json = r.handle("/json");
    assert_eq!(json.content_type, "application/json");
    assert!(json.body.contains("\"indicator_on\":true"));
}

#[test]
fn unknown_path_is_404() {
    let (mut r, _) = router();
    assert_eq!(r.handle("/favicon.ico").status, 404);
}
