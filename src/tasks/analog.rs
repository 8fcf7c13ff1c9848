//! Analog sampler: both ADC channels, converted to volts.
//!
//! The task wakes every `analog_task_period_ms` but only samples once
//! `analog_min_interval_ms` has passed since the last published sample,
//! measured on the monotonic clock. An early wakeup is a no-op.

use log::debug;

use super::{ANALOG_TASK, run_periodic};
use crate::app::events::AppEvent;
use crate::app::ports::{AnalogPort, EventSink, TimePort};
use crate::config::SystemConfig;
use crate::sensors::AdcScale;
use crate::telemetry::{ANALOG_CHANNELS, AnalogSample, AnalogWriter, LivenessToken};

pub struct AnalogSampler<A: AnalogPort, C: TimePort, S: EventSink> {
    adc: A,
    clock: C,
    scale: AdcScale,
    min_interval_us: u64,
    period_ms: u32,
    writer: AnalogWriter,
    liveness: LivenessToken,
    sink: S,
}

impl<A: AnalogPort, C: TimePort, S: EventSink> AnalogSampler<A, C, S> {
    pub fn new(
        config: &SystemConfig,
        adc: A,
        clock: C,
        writer: AnalogWriter,
        liveness: LivenessToken,
        sink: S,
    ) -> Self {
        Self {
            adc,
            clock,
            scale: AdcScale::new(config),
            min_interval_us: u64::from(config.analog_min_interval_ms) * 1000,
            period_ms: config.analog_task_period_ms,
            writer,
            liveness,
            sink,
        }
    }

    /// One iteration. Returns the published samples, or `None` when the
    /// minimum interval has not elapsed yet.
    pub fn step(&mut self) -> Option<[AnalogSample; ANALOG_CHANNELS]> {
        if self.liveness.mark_started() {
            self.sink.emit(&AppEvent::TaskStarted(ANALOG_TASK.label()));
        }

        let now = self.clock.now_us();
        if let Some(last) = self.writer.last_sample_us() {
            if now.saturating_sub(last) < self.min_interval_us {
                return None;
            }
        }

        let samples: [AnalogSample; ANALOG_CHANNELS] =
            core::array::from_fn(|ch| self.scale.sample(self.adc.read_counts(ch)));
        self.writer.publish(samples, now);
        debug!(
            "A0={} ({:.3} V) A1={} ({:.3} V)",
            samples[0].raw, samples[0].volts, samples[1].raw, samples[1].volts
        );
        Some(samples)
    }

    pub fn run(mut self) -> ! {
        let period = self.period_ms;
        run_periodic(period, || {
            self.step();
        })
    }
}
