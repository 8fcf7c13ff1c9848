//! WiFi soft access point.
//!
//! The device hosts its own network; browsers join it and poll the
//! status page. There is no station mode and no reconnection logic: the
//! AP is brought up once at boot and stays up.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all targets**: credential validation, used by config validation
//!   and covered by host tests.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApConfigError {
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for ApConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
        }
    }
}

impl std::error::Error for ApConfigError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ApConfigError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ApConfigError::InvalidSsid);
    }
    Ok(())
}

/// Empty means an open network.
pub fn validate_password(password: &str) -> Result<(), ApConfigError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ApConfigError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF soft AP
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::start_soft_ap;

#[cfg(target_os = "espidf")]
mod esp {
    use anyhow::anyhow;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{
        AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi,
    };
    use log::info;

    use crate::config::SystemConfig;

    /// Bring up the access point and block until its netif is up.
    /// The returned driver must be kept alive for the AP to stay up.
    pub fn start_soft_ap(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: &SystemConfig,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        let mut wifi = BlockingWifi::wrap(
            EspWifi::new(modem, sysloop.clone(), Some(nvs))?,
            sysloop,
        )?;

        let auth_method = if config.ap_password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: config
                .ap_ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("SSID does not fit"))?,
            password: config
                .ap_password
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("password does not fit"))?,
            auth_method,
            channel: 1,
            ..Default::default()
        }))?;

        wifi.start()?;
        wifi.wait_netif_up()?;

        let ip = wifi.wifi().ap_netif().get_ip_info()?.ip;
        info!("WiFi: AP '{}' up at http://{}/", config.ap_ssid, ip);
        Ok(wifi)
    }
}
