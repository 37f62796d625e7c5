//! Button driver: GPIO ISRs feeding a lock-free event channel.
//!
//! Three momentary buttons (UP / DOWN / MODE), active-low with internal
//! pull-ups.  Each falling edge pushes a [`ButtonEvent`] into a static
//! `embassy-sync` channel from ISR context; the buttons task drains the
//! channel at its own pace and applies time-based debouncing before acting.
//!
//! ```text
//! ┌──────────┐  try_send   ┌───────────────┐  try_receive  ┌──────────────┐
//! │ GPIO ISR │────────────▶│ BUTTON_EVENTS │──────────────▶│ buttons task │
//! └──────────┘ (lock-free) └───────────────┘               └──────────────┘
//! ```
//!
//! The channel is a static so the ISR trampolines can reach it; it carries
//! raw edges, not accepted intents — a bouncing contact may enqueue several
//! events that the debounce later collapses into one.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Raw edge event, one per ISR firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Up,
    Down,
    Mode,
}

/// Pending edge capacity. A human cannot outrun 8 slots between two drain
/// cycles; overflow edges are dropped, which debouncing would discard anyway.
const BUTTON_QUEUE_DEPTH: usize = 8;

/// ISR → buttons-task event channel.
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE_DEPTH> =
    Channel::new();

/// Non-blocking drain step for the buttons task.
pub fn try_next_event() -> Option<ButtonEvent> {
    BUTTON_EVENTS.try_receive().ok()
}

/// Push an event from ISR (or simulation/test) context.
/// Lock-free; silently drops on overflow.
pub fn push_event(event: ButtonEvent) {
    let _ = BUTTON_EVENTS.try_send(event);
}

// ── ESP-IDF GPIO + ISR wiring ────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use super::{ButtonEvent, push_event};
    use crate::pins;
    use esp_idf_svc::sys::*;
    use log::info;

    unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
        let pin = arg as i32;
        let event = if pin == pins::BTN_UP_GPIO {
            ButtonEvent::Up
        } else if pin == pins::BTN_DOWN_GPIO {
            ButtonEvent::Down
        } else {
            ButtonEvent::Mode
        };
        push_event(event);
    }

    /// Configure the three button GPIOs and attach falling-edge ISRs.
    pub fn init() -> Result<(), crate::error::Error> {
        let button_pins = [pins::BTN_UP_GPIO, pins::BTN_DOWN_GPIO, pins::BTN_MODE_GPIO];

        // SAFETY: called once from main() before tasks start. The ISR
        // handlers only touch the lock-free channel.
        unsafe {
            let cfg = gpio_config_t {
                pin_bit_mask: button_pins.iter().fold(0u64, |m, &p| m | (1u64 << p)),
                mode: gpio_mode_t_GPIO_MODE_INPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
            };
            let ret = gpio_config(&cfg);
            if ret != ESP_OK as i32 {
                return Err(crate::error::Error::Init("button gpio_config"));
            }

            // ESP_ERR_INVALID_STATE means the service is already installed.
            let ret = gpio_install_isr_service(0);
            if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
                return Err(crate::error::Error::Init("gpio_install_isr_service"));
            }

            for &pin in &button_pins {
                let ret =
                    gpio_isr_handler_add(pin, Some(button_gpio_isr), pin as *mut core::ffi::c_void);
                if ret != ESP_OK as i32 {
                    return Err(crate::error::Error::Init("gpio_isr_handler_add"));
                }
                gpio_intr_enable(pin);
            }
        }

        info!(
            "buttons: initialised (UP={}, DOWN={}, MODE={})",
            pins::BTN_UP_GPIO,
            pins::BTN_DOWN_GPIO,
            pins::BTN_MODE_GPIO
        );
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
pub use esp::init;

#[cfg(not(target_os = "espidf"))]
pub fn init() -> Result<(), crate::error::Error> {
    log::info!("buttons(sim): ISR wiring skipped, inject via push_event()");
    Ok(())
}
