//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the
//! ESP-IDF logger (UART in production). Status pushes go out at debug
//! level; they arrive once per climate tick.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                debug!(
                    "STATUS | A0={} A1={} | T={:.2}\u{00b0}C RH={:.2}% | led={} aux={} \
                     fan={} | emergency={} | cores={}/{} | tasks={}",
                    s.analog[0].raw,
                    s.analog[1].raw,
                    s.climate.temperature_c,
                    s.climate.humidity_pct,
                    u8::from(s.indicator_on),
                    u8::from(s.aux_output_on),
                    s.fan_setpoint,
                    u8::from(s.emergency_active),
                    u8::from(s.core0_active),
                    u8::from(s.core1_active),
                    s.live_task_count,
                );
            }
            AppEvent::EmergencyEntered { distance_cm } => {
                error!("EMERGENCY | entered, distance={:?} cm", distance_cm);
            }
            AppEvent::EmergencyCleared { distance_cm } => {
                info!("EMERGENCY | cleared, distance={:?} cm", distance_cm);
            }
            AppEvent::ClimateReadFailed(e) => {
                warn!("CLIMATE | read failed: {}", e);
            }
            AppEvent::TaskStarted(name) => {
                info!("TASK | {} running", name);
            }
        }
    }
}
