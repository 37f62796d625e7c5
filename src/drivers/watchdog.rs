//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API so each task can subscribe itself and feed
//! the timer once per cycle.  A task that stops feeding for 10 seconds
//! panics the device into a reset — running blind is worse than rebooting.
//!
//! `configure()` is called once from `main()`; every spawned task then
//! calls [`Watchdog::register`] with its own name as its first action.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Reconfigure the TWDT once at startup (10 s timeout, panic on trigger).
pub fn configure() {
    #[cfg(target_os = "espidf")]
    {
        // SAFETY: plain C call with a stack-local config struct.
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms: 10_000,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
            }
        }
    }
    info!("watchdog: configured (10s timeout, panic on trigger)");
}

/// Per-task watchdog subscription handle.
pub struct Watchdog {
    name: &'static str,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Subscribe the *calling* task to the TWDT.
    pub fn register(name: &'static str) -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: null handle means "the current task".
            let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
            let subscribed = ret == ESP_OK;
            if subscribed {
                info!("watchdog: task '{}' subscribed", name);
            } else {
                log::warn!("watchdog: task '{}' failed to subscribe ({})", name, ret);
            }
            Self { name, subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::debug!("watchdog(sim): task '{}' registered (no-op)", name);
            Self { name }
        }
    }

    /// Feed the watchdog. Must be called at least every 10 seconds.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the calling task's TWDT entry.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }

    pub fn task_name(&self) -> &'static str {
        self.name
    }
}
