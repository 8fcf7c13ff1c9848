//! DHT22 / DHT11 single-wire temperature and humidity sensor.
//!
//! The host pulls the open-drain data line low to request a frame, then
//! releases it. The sensor acknowledges with ~80 µs low / ~80 µs high and
//! sends 40 bits MSB first. Each bit is ~50 µs low followed by a high
//! pulse: ~26 µs for `0`, ~70 µs for `1`.
//!
//! ```text
//! byte 0..1  humidity      (DHT22: u16 tenths of %RH)
//! byte 2..3  temperature   (DHT22: 15-bit tenths of °C, bit 15 = sign)
//! byte 4     checksum      (low byte of the sum of bytes 0..3)
//! ```
//!
//! The sensor cannot be re-read faster than about once every two seconds,
//! and pulsing it inside its measurement cycle makes the next frame fail
//! too. The bus is touched at most once per window: a read inside it
//! repeats the outcome of the last attempt. A good frame is reused; a
//! failure is reported again, never replaced by an older reading.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ClimatePort, TimePort};
use crate::config::SystemConfig;
use crate::error::SensorError;
use crate::telemetry::ClimateReading;

/// Longest any single line level lasts within a valid frame.
const LEVEL_TIMEOUT_US: u32 = 100;
/// High pulses longer than this encode a `1`.
const ONE_THRESHOLD_US: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhtModel {
    Dht11,
    Dht22,
}

impl DhtModel {
    fn start_pulse_us(self) -> u32 {
        match self {
            Self::Dht11 => 18_000,
            Self::Dht22 => 1_100,
        }
    }
}

/// Raw 5-byte frame as clocked off the wire.
pub type Frame = [u8; 5];

/// Verify the checksum and convert a frame to physical units.
pub fn decode(model: DhtModel, frame: Frame) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let reading = match model {
        DhtModel::Dht22 => {
            let humidity = u16::from_be_bytes([frame[0], frame[1]]);
            let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]);
            let sign = if frame[2] & 0x80 != 0 { -1.0 } else { 1.0 };
            ClimateReading {
                temperature_c: sign * f32::from(magnitude) / 10.0,
                humidity_pct: f32::from(humidity) / 10.0,
            }
        }
        DhtModel::Dht11 => {
            let sign = if frame[3] & 0x80 != 0 { -1.0 } else { 1.0 };
            ClimateReading {
                temperature_c: sign
                    * (f32::from(frame[2]) + f32::from(frame[3] & 0x7F) / 10.0),
                humidity_pct: f32::from(frame[0]) + f32::from(frame[1]) / 10.0,
            }
        }
    };
    Ok(reading)
}

pub struct Dht<P, D, C> {
    pin: P,
    delay: D,
    clock: C,
    model: DhtModel,
    refresh_interval_us: u64,
    /// Time and outcome of the last bus transaction.
    last_attempt: Option<(u64, Result<ClimateReading, SensorError>)>,
}

impl<P, D, C> Dht<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: TimePort,
{
    pub fn new(pin: P, delay: D, clock: C, model: DhtModel, config: &SystemConfig) -> Self {
        Self {
            pin,
            delay,
            clock,
            model,
            refresh_interval_us: u64::from(config.climate_refresh_interval_ms) * 1000,
            last_attempt: None,
        }
    }

    /// Clock one frame off the wire.
    pub fn read_frame(&mut self) -> Result<Frame, SensorError> {
        self.pin.set_low().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(self.model.start_pulse_us());
        self.pin.set_high().map_err(|_| SensorError::Gpio)?;

        // Released line floats high, then the sensor answers low/high.
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut frame = Frame::default();
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            let byte = &mut frame[bit / 8];
            *byte <<= 1;
            if high_us > ONE_THRESHOLD_US {
                *byte |= 1;
            }
        }
        Ok(frame)
    }

    /// Wait for the line to leave `high`; returns how long it stayed.
    fn wait_while(&mut self, high: bool) -> Result<u32, SensorError> {
        let start = self.clock.now_us();
        loop {
            let level = self.pin.is_high().map_err(|_| SensorError::Gpio)?;
            let elapsed = self.clock.now_us().saturating_sub(start) as u32;
            if level != high {
                return Ok(elapsed);
            }
            if elapsed >= LEVEL_TIMEOUT_US {
                return Err(SensorError::NoResponse);
            }
            self.delay.delay_us(1);
        }
    }
}

impl<P, D, C> ClimatePort for Dht<P, D, C>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    C: TimePort,
{
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        let now = self.clock.now_us();
        if let Some((at, outcome)) = self.last_attempt {
            if now.saturating_sub(at) < self.refresh_interval_us {
                return outcome;
            }
        }

        let outcome = self.read_frame().and_then(|f| decode(self.model, f));
        self.last_attempt = Some((now, outcome));
        outcome
    }
}
