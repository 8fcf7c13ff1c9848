//! Climate sampler: temperature and humidity as one pair.
//!
//! Every tick publishes either a fresh reading or the invalid sentinel;
//! a failed read never leaves the previous values in place. After each
//! publish the sampler pushes a status report to the event sink.

use log::warn;

use super::{CLIMATE_TASK, run_periodic};
use crate::app::events::AppEvent;
use crate::app::ports::{ClimatePort, EventSink, SchedulerProbe};
use crate::app::status::StatusReporter;
use crate::config::SystemConfig;
use crate::telemetry::{ClimateReading, ClimateWriter, LivenessToken};

pub struct ClimateSampler<D: ClimatePort, P: SchedulerProbe, S: EventSink> {
    sensor: D,
    writer: ClimateWriter,
    reporter: StatusReporter<P>,
    liveness: LivenessToken,
    sink: S,
    period_ms: u32,
}

impl<D: ClimatePort, P: SchedulerProbe, S: EventSink> ClimateSampler<D, P, S> {
    pub fn new(
        config: &SystemConfig,
        sensor: D,
        writer: ClimateWriter,
        reporter: StatusReporter<P>,
        liveness: LivenessToken,
        sink: S,
    ) -> Self {
        Self {
            sensor,
            writer,
            reporter,
            liveness,
            sink,
            period_ms: config.climate_task_period_ms,
        }
    }

    /// One iteration; returns what was published.
    pub fn step(&mut self) -> ClimateReading {
        if self.liveness.mark_started() {
            self.sink.emit(&AppEvent::TaskStarted(CLIMATE_TASK.label()));
        }

        let reading = match self.sensor.read_climate() {
            Ok(r) => r,
            Err(e) => {
                warn!("Climate read failed: {e}");
                self.sink.emit(&AppEvent::ClimateReadFailed(e));
                ClimateReading::INVALID
            }
        };
        self.writer.publish(reading);
        self.sink.emit(&AppEvent::Status(self.reporter.report()));
        reading
    }

    pub fn run(mut self) -> ! {
        let period = self.period_ms;
        run_periodic(period, || {
            self.step();
        })
    }
}
