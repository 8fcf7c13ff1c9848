//! System configuration parameters
//!
//! All tunable parameters for the SuperMon system. Values are compiled in
//! as defaults; nothing is persisted across reboots.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What the interlock does when the ranging echo never arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EchoTimeoutPolicy {
    /// A missing echo counts as "no obstacle" for that cycle.
    AssumeClear,
    /// A single timeout holds the current state; a run of
    /// `echo_timeouts_before_trip` consecutive timeouts trips the interlock.
    FailSafe,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Analog sampler ---
    /// Analog task loop period (milliseconds)
    pub analog_task_period_ms: u32,
    /// Minimum time between two analog samples (milliseconds)
    pub analog_min_interval_ms: u32,
    /// ADC reference voltage (volts)
    pub adc_reference_volts: f32,
    /// ADC full-scale count (2^bit-width)
    pub adc_full_scale: u16,

    // --- Climate sampler ---
    /// Climate task loop period (milliseconds)
    pub climate_task_period_ms: u32,
    /// Shortest interval at which the climate sensor produces a new frame
    pub climate_refresh_interval_ms: u32,

    // --- Ranging / interlock ---
    /// Ranging task loop period (milliseconds)
    pub ranging_task_period_ms: u32,
    /// Distance (cm) below which the interlock trips
    pub emergency_distance_cm: f32,
    /// Extra distance (cm) above the threshold required to release.
    /// Zero keeps the single-threshold behaviour.
    pub release_margin_cm: f32,
    /// Upper bound on each echo edge wait (microseconds)
    pub echo_timeout_us: u32,
    /// Handling of a missing echo
    pub echo_timeout_policy: EchoTimeoutPolicy,
    /// Consecutive timeouts that trip the interlock under `FailSafe`
    pub echo_timeouts_before_trip: u8,
    /// Speed of sound (cm per microsecond)
    pub speed_of_sound_cm_per_us: f32,

    // --- Fan ---
    /// LEDC PWM frequency for the fan (Hz)
    pub fan_pwm_freq_hz: u32,
    /// Nominal fan speed at full duty (RPM)
    pub fan_max_rpm: u32,

    // --- Network ---
    /// Soft access point SSID
    pub ap_ssid: heapless::String<32>,
    /// Soft access point WPA2 password (empty = open)
    pub ap_password: heapless::String<64>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Analog
            analog_task_period_ms: 10,
            analog_min_interval_ms: 50, // 20 Hz
            adc_reference_volts: 3.3,
            adc_full_scale: 4096,

            // Climate
            climate_task_period_ms: 100, // 10 Hz
            climate_refresh_interval_ms: 2000,

            // Ranging
            ranging_task_period_ms: 100, // 10 Hz
            emergency_distance_cm: 20.0,
            release_margin_cm: 0.0,
            echo_timeout_us: 30_000,
            echo_timeout_policy: EchoTimeoutPolicy::FailSafe,
            echo_timeouts_before_trip: 3,
            speed_of_sound_cm_per_us: 0.0343,

            // Fan
            fan_pwm_freq_hz: 10_000,
            fan_max_rpm: 2400,

            // Network
            ap_ssid: heapless::String::try_from("TestWebSite").unwrap_or_default(),
            ap_password: heapless::String::try_from("12345678").unwrap_or_default(),
        }
    }
}

impl SystemConfig {
    /// Reject values that would stall a task or make the conversions
    /// meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analog_task_period_ms == 0
            || self.climate_task_period_ms == 0
            || self.ranging_task_period_ms == 0
        {
            return Err(ConfigError::ValidationFailed("task periods must be > 0"));
        }
        if self.adc_full_scale == 0 {
            return Err(ConfigError::ValidationFailed("adc_full_scale must be > 0"));
        }
        if !positive(self.adc_reference_volts) {
            return Err(ConfigError::ValidationFailed("adc_reference_volts must be > 0"));
        }
        if !positive(self.emergency_distance_cm) {
            return Err(ConfigError::ValidationFailed("emergency_distance_cm must be > 0"));
        }
        if !(self.release_margin_cm.is_finite() && self.release_margin_cm >= 0.0) {
            return Err(ConfigError::ValidationFailed("release_margin_cm must be >= 0"));
        }
        if self.echo_timeout_us == 0 {
            return Err(ConfigError::ValidationFailed("echo_timeout_us must be > 0"));
        }
        if self.echo_timeout_policy == EchoTimeoutPolicy::FailSafe
            && self.echo_timeouts_before_trip == 0
        {
            return Err(ConfigError::ValidationFailed(
                "echo_timeouts_before_trip must be > 0",
            ));
        }
        if !positive(self.speed_of_sound_cm_per_us) {
            return Err(ConfigError::ValidationFailed(
                "speed_of_sound_cm_per_us must be > 0",
            ));
        }
        if self.fan_pwm_freq_hz == 0 {
            return Err(ConfigError::ValidationFailed("fan_pwm_freq_hz must be > 0"));
        }
        crate::adapters::wifi::validate_ssid(&self.ap_ssid)
            .map_err(|_| ConfigError::ValidationFailed("ap_ssid must be 1-32 printable bytes"))?;
        crate::adapters::wifi::validate_password(&self.ap_password).map_err(|_| {
            ConfigError::ValidationFailed("ap_password must be empty or 8-64 bytes")
        })?;
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
