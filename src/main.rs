//! SuperMon Firmware — Main Entry Point
//!
//! Builds the shared telemetry store, hands each task the handles it
//! owns, spawns the samplers on their cores, then brings up the soft AP
//! and the HTTP server.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                       │
//! │                                                                  │
//! │  AdcAdapter   OutputAdapter   AlarmAdapter   LogEventSink        │
//! │  Hcsr04       Dht             Esp32Time      httpd · soft AP     │
//! │                                                                  │
//! │  ──────────────── Port Trait Boundary ───────────────────        │
//! │                                                                  │
//! │  App core: ranging ─▶ SafetyInterlock   analog   climate         │
//! │            Router ─▶ CommandInterface · StatusReporter           │
//! │                                                                  │
//! │  TelemetryHandles: one writer per field group, cloneable reader  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::info;

use supermon::adapters::hardware::{AdcAdapter, AlarmAdapter, OutputAdapter};
use supermon::adapters::log_sink::LogEventSink;
use supermon::adapters::time::Esp32TimeAdapter;
use supermon::adapters::{http, wifi};
use supermon::app::commands::CommandInterface;
use supermon::app::router::Router;
use supermon::app::status::StatusReporter;
use supermon::config::SystemConfig;
use supermon::drivers::fan::FanDriver;
use supermon::drivers::hw_init;
use supermon::drivers::outputs::DigitalOutput;
use supermon::drivers::task_pin::PinnedTaskProbe;
use supermon::error::Error;
use supermon::interlock::SafetyInterlock;
use supermon::pins;
use supermon::sensors::{Dht, DhtModel, Hcsr04};
use supermon::tasks::{
    ANALOG_TASK, AnalogSampler, CLIMATE_TASK, ClimateSampler, RANGING_TASK, RangingSampler,
};
use supermon::telemetry::TelemetryHandles;

// `main` claims these typed pins; the board map must name the same ones.
const _: () = {
    assert!(pins::RANGING_TRIGGER_GPIO == 5);
    assert!(pins::RANGING_ECHO_GPIO == 18);
    assert!(pins::CLIMATE_DATA_GPIO == 4);
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SuperMon v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate().map_err(Error::from)?;

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(&config).map_err(Error::from)?;
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let clock = Esp32TimeAdapter::new();

    // ── 3. Shared state ───────────────────────────────────────
    let telemetry = TelemetryHandles::new();
    let ranging_live = telemetry.liveness_token();
    let analog_live = telemetry.liveness_token();
    let climate_live = telemetry.liveness_token();
    let reporter = StatusReporter::new(telemetry.reader.clone(), PinnedTaskProbe);

    // ── 4. Ranging + interlock (highest priority) ─────────────
    info!(
        "Ranging on GPIO{} (trigger) / GPIO{} (echo)",
        pins::RANGING_TRIGGER_GPIO,
        pins::RANGING_ECHO_GPIO
    );
    let ranger = Hcsr04::new(
        PinDriver::output(peripherals.pins.gpio5)?,
        PinDriver::input(peripherals.pins.gpio18)?,
        Ets,
        clock,
        &config,
    );
    let safety = SafetyInterlock::new(
        &config,
        telemetry.interlock,
        AlarmAdapter::new(DigitalOutput::alarm()),
        LogEventSink::new(),
    );
    let ranging = RangingSampler::new(&config, ranger, safety, ranging_live);
    let _ranging = RANGING_TASK.spawn(move || ranging.run())?;

    // ── 5. Analog sampler ─────────────────────────────────────
    let analog = AnalogSampler::new(
        &config,
        AdcAdapter,
        clock,
        telemetry.analog,
        analog_live,
        LogEventSink::new(),
    );
    let _analog = ANALOG_TASK.spawn(move || analog.run())?;

    // ── 6. Climate sampler ────────────────────────────────────
    info!("Climate sensor on GPIO{}", pins::CLIMATE_DATA_GPIO);
    let dht = Dht::new(
        PinDriver::input_output_od(peripherals.pins.gpio4)?,
        Ets,
        clock,
        DhtModel::Dht22,
        &config,
    );
    let climate = ClimateSampler::new(
        &config,
        dht,
        telemetry.climate,
        reporter.clone(),
        climate_live,
        LogEventSink::new(),
    );
    let _climate = CLIMATE_TASK.spawn(move || climate.run())?;

    // ── 7. Command interface + network ────────────────────────
    let commands = CommandInterface::new(
        &config,
        telemetry.actuators,
        OutputAdapter::new(
            FanDriver::new(),
            DigitalOutput::indicator(),
            DigitalOutput::aux_output(),
        ),
    );
    let router = http::shared(Router::new(commands, reporter.clone()));

    let _wifi = wifi::start_soft_ap(peripherals.modem, sysloop, nvs, &config)?;
    let _server = http::start_server(router)?;

    info!("System ready.");

    // ── 8. Idle ───────────────────────────────────────────────
    loop {
        std::thread::sleep(Duration::from_secs(60));
        let s = reporter.report();
        info!(
            "uptime {}s | tasks={} | emergency={} | fan={}",
            clock.uptime_secs(),
            s.live_task_count,
            s.emergency_active,
            s.fan_setpoint
        );
    }
}
