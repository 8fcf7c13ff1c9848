//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                  |
//! |-------------|---------------|------------------------------|
//! | `hardware`  | AnalogPort    | ESP32 ADC1 oneshot           |
//! |             | ActuatorPort  | LEDC PWM (fan), GPIO outputs |
//! |             | AlarmPort     | GPIO output                  |
//! | `log_sink`  | EventSink     | Serial log output            |
//! | `time`      | TimePort      | ESP32 high-resolution timer  |
//! | `http`      | —             | ESP-IDF httpd → `Router`     |
//! | `wifi`      | —             | ESP-IDF WiFi soft AP         |

pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
