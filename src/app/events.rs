//! Outbound application events.
//!
//! Samplers and the interlock emit these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them (serial log today).

use super::status::StatusReport;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Push-style status refresh after a climate sample.
    Status(StatusReport),

    /// Interlock tripped: Normal → Emergency.
    EmergencyEntered {
        /// Distance that caused the trip, `None` for an echo-timeout trip.
        distance_cm: Option<f32>,
    },

    /// Interlock released: Emergency → Normal.
    EmergencyCleared {
        /// Distance that released it, `None` when an echo timeout was
        /// read as a clear path.
        distance_cm: Option<f32>,
    },

    /// Climate sensor read failed; fields now hold the invalid sentinel.
    ClimateReadFailed(crate::error::SensorError),

    /// A task ran its first iteration.
    TaskStarted(&'static str),
}
