//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter     | Implements       | Connects to               |
//! |-------------|------------------|---------------------------|
//! | `http`      | TelemetryPort    | HTTP collector endpoint   |
//! | `time`      | —                | ESP32 timer, SNTP, RTC    |
//! | `wifi`      | ConnectivityPort | ESP-IDF WiFi STA          |
//! | `device_id` | —                | eFuse factory MAC         |

pub mod device_id;
pub mod http;
pub mod time;
pub mod wifi;
