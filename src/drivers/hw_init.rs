//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit for both analog inputs, the plain
//! GPIO outputs (indicator, aux, alarm) and the LEDC timer/channel that
//! drives the fan, using raw ESP-IDF sys calls. Called once from `main()`
//! before any task is spawned.
//!
//! The ranger and climate sensor pins are not touched here; they are
//! owned through `esp-idf-hal` `PinDriver`s by their sampler tasks.
//!
//! On host builds every write lands in a static mirror that tests can
//! read back.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::SystemConfig;
use crate::pins;

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

/// ESP32 ADC1 channel wired to `gpio`. Fails the build for any other pin.
const fn adc1_channel(gpio: i32) -> u32 {
    match gpio {
        36 => 0,
        37 => 1,
        38 => 2,
        39 => 3,
        32 => 4,
        33 => 5,
        34 => 6,
        35 => 7,
        _ => panic!("analog input must be an ADC1 pin"),
    }
}

/// ADC1 channels behind analog inputs 0 and 1.
pub const ADC1_CHANNELS: [u32; 2] = [
    adc1_channel(pins::ANALOG_A0_GPIO),
    adc1_channel(pins::ANALOG_A1_GPIO),
];

pub const LEDC_CH_FAN: u32 = 0;

const OUTPUT_PINS: [i32; 3] = [
    pins::INDICATOR_LED_GPIO,
    pins::AUX_OUTPUT_GPIO,
    pins::ALARM_GPIO,
];

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &SystemConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
        init_ledc(config.fan_pwm_freq_hz)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(config: &SystemConfig) -> Result<(), HwInitError> {
    for pin in OUTPUT_PINS {
        gpio_write(pin, false);
    }
    ledc_set(LEDC_CH_FAN, 0);
    log::info!(
        "hw_init(sim): peripherals reset (fan PWM {} Hz)",
        config.fan_pwm_freq_hz
    );
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: `ADC1_HANDLE` is written once by `init_adc()` before any task
/// exists; afterwards it is only read.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in ADC1_CHANNELS {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!(
        "hw_init: ADC1 configured (A0=GPIO{} CH{}, A1=GPIO{} CH{}, 12-bit)",
        pins::ANALOG_A0_GPIO,
        ADC1_CHANNELS[0],
        pins::ANALOG_A1_GPIO,
        ADC1_CHANNELS[1]
    );
    Ok(())
}

/// Raw 12-bit counts, or 0 if the conversion failed.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract. Only the analog task reads ADC1.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.max(0) as u16
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for &pin in &OUTPUT_PINS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: GPIO outputs configured (LED, aux, alarm)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an output configured in
    // init_gpio_outputs(); each pin has exactly one owning driver.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(freq_hz: u32) -> Result<(), HwInitError> {
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: LEDC_CH_FAN,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::FAN_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!(
        "hw_init: LEDC configured (fan=CH0 on GPIO{}, {} Hz, {}-bit)",
        pins::FAN_PWM_GPIO,
        freq_hz,
        pins::PWM_RESOLUTION_BITS
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: the channel was configured in init_ledc(); only the fan
    // driver writes it.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

// ── Host mirror ───────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};

    static GPIO_LEVELS: AtomicU64 = AtomicU64::new(0);
    static LEDC_DUTY: AtomicU8 = AtomicU8::new(0);

    pub fn gpio_write(pin: i32, high: bool) {
        let bit = 1u64 << pin;
        if high {
            GPIO_LEVELS.fetch_or(bit, Ordering::Relaxed);
        } else {
            GPIO_LEVELS.fetch_and(!bit, Ordering::Relaxed);
        }
    }

    pub fn gpio_level(pin: i32) -> bool {
        GPIO_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
    }

    pub fn ledc_set(duty: u8) {
        LEDC_DUTY.store(duty, Ordering::Relaxed);
    }

    pub fn ledc_duty() -> u8 {
        LEDC_DUTY.load(Ordering::Relaxed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> u16 {
    ADC1_CHANNELS
        .iter()
        .position(|&c| c == channel)
        .map_or(0, crate::sensors::analog::sim_counts)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::gpio_write(pin, high);
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, duty: u8) {
    sim::ledc_set(duty);
}

/// Last level written to `pin` (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: i32) -> bool {
    sim::gpio_level(pin)
}

/// Last duty written to the fan channel (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_fan_duty() -> u8 {
    sim::ledc_duty()
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn analog_pins_map_to_adc1_channels() {
        assert_eq!(ADC1_CHANNELS, [6, 7]);
        assert_eq!(adc1_channel(36), 0);
        assert_eq!(adc1_channel(32), 4);
    }
}
