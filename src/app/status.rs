//! Status reporter.
//!
//! Builds a [`StatusReport`] from one consistent telemetry snapshot plus
//! the scheduler's per-core liveness, and renders it in the fixed XML
//! shape the browser UI polls:
//!
//! ```text
//! <?xml version='1.0'?>
//! <Data>
//! <B0>..</B0> <V0>..</V0> <B1>..</B1> <V1>..</V1>
//! <LED>..</LED> <SWITCH>..</SWITCH> <EMERGENCY_MODE>..</EMERGENCY_MODE>
//! <CORE0_STATUS>..</CORE0_STATUS> <CORE1_STATUS>..</CORE1_STATUS>
//! <DHT_READINGS><TEMP>..</TEMP><HUMIDITY>..</HUMIDITY></DHT_READINGS>
//! <TASK_COUNT>..</TASK_COUNT>
//! </Data>
//! ```
//!
//! Rendering goes into a fixed-capacity buffer; nothing allocates.

use core::fmt::{self, Write};

use serde::Serialize;

use super::ports::SchedulerProbe;
use crate::drivers::task_pin::Core;
use crate::telemetry::{ANALOG_CHANNELS, AnalogSample, ClimateReading, TelemetryReader};

/// Capacity of the rendered XML document.
pub const XML_CAPACITY: usize = 768;

pub type XmlBuffer = heapless::String<XML_CAPACITY>;

/// Point-in-time status, ready to serialize.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    pub analog: [AnalogSample; ANALOG_CHANNELS],
    pub indicator_on: bool,
    pub aux_output_on: bool,
    pub emergency_active: bool,
    pub core0_active: bool,
    pub core1_active: bool,
    pub climate: ClimateReading,
    pub fan_setpoint: u8,
    pub live_task_count: u8,
}

impl StatusReport {
    /// Render the canonical XML document.
    pub fn render_xml(&self) -> Result<XmlBuffer, fmt::Error> {
        let mut out = XmlBuffer::new();
        out.write_str("<?xml version='1.0'?>\n<Data>\n")?;
        for (i, ch) in self.analog.iter().enumerate() {
            writeln!(out, "<B{i}>{}</B{i}>", ch.raw)?;
            write!(out, "<V{i}>")?;
            write_volts(&mut out, ch.volts)?;
            writeln!(out, "</V{i}>")?;
        }
        writeln!(out, "<LED>{}</LED>", flag(self.indicator_on))?;
        writeln!(out, "<SWITCH>{}</SWITCH>", flag(self.aux_output_on))?;
        writeln!(
            out,
            "<EMERGENCY_MODE>{}</EMERGENCY_MODE>",
            flag(self.emergency_active)
        )?;
        writeln!(out, "<CORE0_STATUS>{}</CORE0_STATUS>", flag(self.core0_active))?;
        writeln!(out, "<CORE1_STATUS>{}</CORE1_STATUS>", flag(self.core1_active))?;
        out.write_str("<DHT_READINGS><TEMP>")?;
        write_reading(&mut out, self.climate.temperature_c)?;
        out.write_str("</TEMP><HUMIDITY>")?;
        write_reading(&mut out, self.climate.humidity_pct)?;
        out.write_str("</HUMIDITY></DHT_READINGS>\n")?;
        writeln!(out, "<TASK_COUNT>{}</TASK_COUNT>", self.live_task_count)?;
        out.write_str("</Data>\n")?;
        Ok(out)
    }

    /// JSON rendering of the same snapshot. Invalid readings become `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn flag(on: bool) -> u8 {
    u8::from(on)
}

/// Integer part, '.', then the first decimal digit of the magnitude.
/// Truncates; never rounds. `2.99` → `2.9`, `-0.57` → `0.5`.
pub fn write_volts(out: &mut impl Write, volts: f32) -> fmt::Result {
    let whole = volts as i32;
    let tenths = ((volts * 10.0) as i32 - whole * 10).abs();
    write!(out, "{whole}.{tenths}")
}

/// Two decimals, or `nan` when the sensor has no valid reading.
fn write_reading(out: &mut impl Write, value: f32) -> fmt::Result {
    if value.is_nan() {
        out.write_str("nan")
    } else {
        write!(out, "{value:.2}")
    }
}

// ───────────────────────────────────────────────────────────────
// Reporter
// ───────────────────────────────────────────────────────────────

/// Cheap to clone; callable from any task concurrently with the samplers.
#[derive(Clone)]
pub struct StatusReporter<P: SchedulerProbe> {
    reader: TelemetryReader,
    probe: P,
}

impl<P: SchedulerProbe> StatusReporter<P> {
    pub fn new(reader: TelemetryReader, probe: P) -> Self {
        Self { reader, probe }
    }

    pub fn report(&self) -> StatusReport {
        let s = self.reader.snapshot();
        StatusReport {
            analog: s.analog,
            indicator_on: s.indicator_on,
            aux_output_on: s.aux_output_on,
            emergency_active: s.emergency_active,
            core0_active: self.probe.core_active(Core::Pro),
            core1_active: self.probe.core_active(Core::App),
            climate: s.climate,
            fan_setpoint: s.fan_setpoint,
            live_task_count: s.live_task_count,
        }
    }
}
