//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs trigger pulse starts a measurement; the sensor answers with an
//! echo pulse whose width is the round-trip time of flight.
//!
//! ```text
//! trigger ─┐‾‾‾‾‾└──────────────────────────────
//! echo    ──────────┐‾‾‾‾‾‾‾‾ width ‾‾‾‾‾‾‾‾└───
//! ```
//!
//! Every wait on the echo line is bounded by `echo_timeout_us`. An echo
//! that never rises, or a line still high from the previous cycle, returns
//! [`SensorError::EchoTimeout`]. An echo that rises but outlasts the bound
//! is the sensor's "nothing in range" answer (~38 ms on an HC-SR04) and
//! reads as the bound itself, i.e. the maximum measurable distance.
//! The driver owns the trigger and echo pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{RangingPort, TimePort};
use crate::config::SystemConfig;
use crate::error::SensorError;

const TRIGGER_PULSE_US: u32 = 10;

pub struct Hcsr04<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u64,
    cm_per_us: f32,
}

impl<T, E, D, C> Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: TimePort,
{
    pub fn new(trigger: T, echo: E, delay: D, clock: C, config: &SystemConfig) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            timeout_us: u64::from(config.echo_timeout_us),
            cm_per_us: config.speed_of_sound_cm_per_us,
        }
    }

    /// Fire one trigger pulse and return the echo width in microseconds.
    pub fn measure_pulse_us(&mut self) -> Result<u32, SensorError> {
        // A previous echo may still be in flight.
        let idle_since = self.clock.now_us();
        self.wait_for_echo(false, idle_since)?;

        self.trigger.set_low().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| SensorError::Gpio)?;

        let armed = self.clock.now_us();
        let rise = self.wait_for_echo(true, armed)?;
        match self.wait_for_echo(false, rise) {
            Ok(fall) => Ok(fall.saturating_sub(rise) as u32),
            Err(SensorError::EchoTimeout) => Ok(self.max_pulse_us()),
            Err(e) => Err(e),
        }
    }

    /// Widest pulse the driver waits for; anything longer is out of range.
    pub fn max_pulse_us(&self) -> u32 {
        u32::try_from(self.timeout_us).unwrap_or(u32::MAX)
    }

    /// `width * speedOfSound / 2`.
    pub fn pulse_to_cm(&self, width_us: u32) -> f32 {
        width_us as f32 * self.cm_per_us / 2.0
    }

    /// Poll the echo line until it reads `high`, returning the time it did.
    fn wait_for_echo(&mut self, high: bool, since: u64) -> Result<u64, SensorError> {
        loop {
            let level = self.echo.is_high().map_err(|_| SensorError::Gpio)?;
            let now = self.clock.now_us();
            if level == high {
                return Ok(now);
            }
            if now.saturating_sub(since) >= self.timeout_us {
                return Err(SensorError::EchoTimeout);
            }
            self.delay.delay_us(1);
        }
    }
}

impl<T, E, D, C> RangingPort for Hcsr04<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: TimePort,
{
    fn measure_distance_cm(&mut self) -> Result<f32, SensorError> {
        let width = self.measure_pulse_us()?;
        Ok(self.pulse_to_cm(width))
    }
}
