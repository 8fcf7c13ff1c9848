//! GPIO / peripheral pin assignments for the SuperMon board (ESP32 DevKit).
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. The ranging and climate pins are claimed as
//! typed `esp-idf-hal` peripherals in `main`; keep the numbers here in sync.

// ---------------------------------------------------------------------------
// Fan (LEDC PWM)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the fan MOSFET gate.
pub const FAN_PWM_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Digital outputs
// ---------------------------------------------------------------------------

/// On-board indicator LED (active HIGH).
pub const INDICATOR_LED_GPIO: i32 = 2;
/// Auxiliary switched output (relay / load), active HIGH.
pub const AUX_OUTPUT_GPIO: i32 = 26;
/// Piezo buzzer / alarm driver, active HIGH.
pub const ALARM_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Analog input A0 — ADC1 channel 6 (GPIO 34, input-only pin).
pub const ANALOG_A0_GPIO: i32 = 34;
/// Analog input A1 — ADC1 channel 7 (GPIO 35, input-only pin).
pub const ANALOG_A1_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// Sensors — Digital
// ---------------------------------------------------------------------------

/// HC-SR04 trigger (output).
pub const RANGING_TRIGGER_GPIO: i32 = 5;
/// HC-SR04 echo (input, 5 V → 3.3 V divided).
pub const RANGING_ECHO_GPIO: i32 = 18;
/// DHT22 single-wire data line (open-drain, external 10 kΩ pull-up).
pub const CLIMATE_DATA_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
