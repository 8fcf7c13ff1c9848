//! Samplers → telemetry → status report, with the real ADC adapter
//! (simulated counts) and the real scheduler probe.

use std::sync::mpsc;

use crate::mock_hw::{FixedProbe, ManualClock, RecordingSink, ScriptedClimate};

use supermon::adapters::hardware::AdcAdapter;
use supermon::app::status::StatusReporter;
use supermon::config::SystemConfig;
use supermon::drivers::task_pin::{Core, PinnedTaskProbe, spawn_on_core};
use supermon::error::SensorError;
use supermon::sensors::analog::sim_set_counts;
use supermon::tasks::{AnalogSampler, ClimateSampler};
use supermon::telemetry::{ClimateReading, TelemetryHandles};

#[test]
fn analog_samples_render_truncated_volts() {
    let h = TelemetryHandles::new();
    let token = h.liveness_token();
    let clock = ManualClock::default();
    let mut sampler = AnalogSampler::new(
        &SystemConfig::default(),
        AdcAdapter,
        clock.clone(),
        h.analog,
        token,
        RecordingSink::default(),
    );

    sim_set_counts(0, 4095);
    sim_set_counts(1, 3722);
    assert!(sampler.step().is_some());

    let xml = StatusReporter::new(h.reader.clone(), FixedProbe::default())
        .report()
        .render_xml()
        .unwrap();
    // 4095 → 3.299 V, 3722 → 2.998 V: truncated, never rounded up.
    assert!(xml.contains("<B0>4095</B0>\n<V0>3.2</V0>"), "{xml}");
    assert!(xml.contains("<B1>3722</B1>\n<V1>2.9</V1>"), "{xml}");
    assert!(xml.contains("<TASK_COUNT>1</TASK_COUNT>"));

    // Inside the 50 ms guard nothing is republished.
    sim_set_counts(0, 0);
    clock.advance_ms(10);
    assert!(sampler.step().is_none());
    clock.advance_ms(40);
    let fresh = sampler.step().unwrap();
    assert_eq!(fresh[0].raw, 0);
    assert_eq!(h.reader.snapshot().live_task_count, 1);
}

#[test]
fn climate_ticks_push_status_with_latest_pair() {
    let h = TelemetryHandles::new();
    let token = h.liveness_token();
    let good = ClimateReading {
        temperature_c: 24.25,
        humidity_pct: 55.5,
    };
    let script = vec![Ok(good), Err(SensorError::NoResponse)];
    let mut sampler = ClimateSampler::new(
        &SystemConfig::default(),
        ScriptedClimate(script.into()),
        h.climate,
        StatusReporter::new(h.reader.clone(), FixedProbe::default()),
        token,
        RecordingSink::default(),
    );

    sampler.step();
    let xml = StatusReporter::new(h.reader.clone(), FixedProbe::default())
        .report()
        .render_xml()
        .unwrap();
    assert!(xml.contains("<DHT_READINGS><TEMP>24.25</TEMP><HUMIDITY>55.50</HUMIDITY></DHT_READINGS>"));

    sampler.step();
    let report = StatusReporter::new(h.reader.clone(), FixedProbe::default()).report();
    assert!(!report.climate.is_valid());
    assert!(
        report
            .render_xml()
            .unwrap()
            .contains("<TEMP>nan</TEMP><HUMIDITY>nan</HUMIDITY>")
    );
    assert!(report.to_json().unwrap().contains("\"humidity_pct\":null"));
}

#[test]
fn core_flags_follow_spawned_tasks() {
    let h = TelemetryHandles::new();
    let reporter = StatusReporter::new(h.reader.clone(), PinnedTaskProbe);
    assert!(!reporter.report().core1_active);

    let (started_tx, started_rx) = mpsc::channel();
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let handle = spawn_on_core(Core::App, 10, 64, "status-probe\0", move || {
        started_tx.send(()).unwrap();
        stop_rx.recv().unwrap();
    })
    .unwrap();
    started_rx.recv().unwrap();

    let running = reporter.report();
    assert!(running.core1_active);
    assert!(!running.core0_active);

    stop_tx.send(()).unwrap();
    handle.join().unwrap();
    assert!(!reporter.report().core1_active);
}

#[test]
fn climate_pairs_publish_together() {
    let h = TelemetryHandles::new();
    let token = h.liveness_token();
    let readings: Vec<_> = (0..5)
        .map(|i| {
            Ok(ClimateReading {
                temperature_c: i as f32,
                humidity_pct: i as f32 + 1000.0,
            })
        })
        .collect();
    let mut sampler = ClimateSampler::new(
        &SystemConfig::default(),
        ScriptedClimate(readings.into()),
        h.climate,
        StatusReporter::new(h.reader.clone(), FixedProbe::default()),
        token,
        RecordingSink::default(),
    );
    let mut last = Vec::new();
    for _ in 0..5 {
        sampler.step();
        last.push(h.reader.snapshot().climate);
    }
    for c in last {
        assert_eq!(c.humidity_pct - c.temperature_c, 1000.0);
    }
}
