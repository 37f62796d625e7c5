//! Buttons task.
//!
//! Drains the ISR event channel at a fixed cadence, collapses contact
//! bounce with a per-button time window, and forwards each accepted press
//! to the command handler as a deliberate intent.

use std::thread::JoinHandle;
use std::time::Duration;

use log::debug;

use crate::adapters::time::SystemClock;
use crate::app::commands::Command;
use crate::app::service::CommandHandler;
use crate::config::{BUTTON_DEBOUNCE_MS, PERIOD_BUTTONS_MS, TASK_PRIO_BUTTONS, TASK_STACK_BUTTONS_KB};
use crate::drivers::buttons::{self, ButtonEvent};
use crate::drivers::task_pin::{self, Core};
use crate::drivers::watchdog::Watchdog;

pub fn spawn(handler: CommandHandler) -> JoinHandle<()> {
    task_pin::spawn_on_core(
        Core::App,
        TASK_PRIO_BUTTONS,
        TASK_STACK_BUTTONS_KB,
        "buttons\0",
        move || run(&handler),
    )
}

fn run(handler: &CommandHandler) {
    let watchdog = Watchdog::register("buttons");
    let clock = SystemClock::new();
    let mut debounce = Debounce::new();

    loop {
        while let Some(event) = buttons::try_next_event() {
            let now_ms = clock.uptime_ms();
            if let Some(cmd) = debounce.accept(event, now_ms) {
                handler.handle(cmd);
            } else {
                debug!("buttons: {event:?} ignored (debounce)");
            }
        }

        watchdog.feed();
        std::thread::sleep(Duration::from_millis(PERIOD_BUTTONS_MS));
    }
}

/// Per-button time-window debounce.
///
/// The ISR delivers raw edges; two edges of the same button closer than
/// [`BUTTON_DEBOUNCE_MS`] are one physical press.
struct Debounce {
    last_up_ms: u32,
    last_down_ms: u32,
    last_mode_ms: u32,
}

impl Debounce {
    fn new() -> Self {
        // Saturating subtraction below makes 0 behave as "long ago".
        Self {
            last_up_ms: 0,
            last_down_ms: 0,
            last_mode_ms: 0,
        }
    }

    /// Map an accepted edge to its command; `None` when bounced.
    fn accept(&mut self, event: ButtonEvent, now_ms: u32) -> Option<Command> {
        let last = match event {
            ButtonEvent::Up => &mut self.last_up_ms,
            ButtonEvent::Down => &mut self.last_down_ms,
            ButtonEvent::Mode => &mut self.last_mode_ms,
        };

        if *last != 0 && now_ms.wrapping_sub(*last) < BUTTON_DEBOUNCE_MS {
            return None;
        }
        *last = now_ms;

        Some(match event {
            ButtonEvent::Up => Command::RaiseSetpoint,
            ButtonEvent::Down => Command::LowerSetpoint,
            ButtonEvent::Mode => Command::CycleMode,
        })
    }
}
