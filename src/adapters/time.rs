//! System clock adapter.
//!
//! Monotonic uptime for sample timestamps plus wall-clock RFC-3339
//! formatting for telemetry.
//!
//! - **`target_os = "espidf"`** — uptime wraps `esp_timer_get_time()`
//!   (microsecond precision, monotonic); wall clock becomes valid once the
//!   SNTP client has synchronised.
//! - **`not(target_os = "espidf")`** — `std::time::Instant` for uptime,
//!   host clock for wall time.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Wall-clock readings before this instant mean "not yet synchronised"
/// (the ESP32 boots with its RTC at the Unix epoch).
const EPOCH_2020_SECS: i64 = 1_577_836_800;

pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(target_os = "espidf")]
    _sntp: Option<esp_idf_svc::sntp::EspSntp<'static>>,
}

impl SystemClock {
    /// Monotonic-only clock. Tasks that just need uptime use this.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            Self { _sntp: None }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            Self {
                start: std::time::Instant::now(),
            }
        }
    }

    /// Clock that also starts the SNTP client so the wall-clock side
    /// becomes valid. Exactly one task (telemetry) should hold this.
    pub fn with_sntp() -> Self {
        #[cfg(target_os = "espidf")]
        {
            let sntp = match esp_idf_svc::sntp::EspSntp::new_default() {
                Ok(sntp) => Some(sntp),
                Err(e) => {
                    log::warn!("SNTP init failed ({e}); telemetry timestamps unavailable");
                    None
                }
            };
            Self { _sntp: sntp }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            Self::new()
        }
    }

    /// Milliseconds since boot (monotonic, wraps at `u32::MAX` ≈ 49 days).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }

    /// Milliseconds since boot (monotonic, wraps at `u32::MAX` ≈ 49 days).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// RFC-3339 wall-clock timestamp, or `None` until the clock is set.
    pub fn now_iso8601(&self) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        // Reject obviously unsynced time (pre-2020 means no SNTP fix yet).
        if now.unix_timestamp() < EPOCH_2020_SECS {
            return None;
        }
        now.format(&Rfc3339).ok()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}
