//! Display task.
//!
//! Blocks on its state subscription and renders every delivered snapshot.
//! A render failure is logged and the cycle skipped — the LCD going dark
//! must never disturb control, telemetry, or input handling.

use std::sync::Arc;
use std::thread::JoinHandle;

use log::error;

use crate::app::ports::DisplayPort;
use crate::channel::LatestSlot;
use crate::config::{TASK_PRIO_DISPLAY, TASK_STACK_DISPLAY_KB};
use crate::drivers::display::Lcd;
use crate::drivers::task_pin::{self, Core};
use crate::drivers::watchdog::Watchdog;
use crate::engine::ThermostatState;

pub fn spawn(states: Arc<LatestSlot<ThermostatState>>) -> JoinHandle<()> {
    task_pin::spawn_on_core(
        Core::App,
        TASK_PRIO_DISPLAY,
        TASK_STACK_DISPLAY_KB,
        "display\0",
        move || {
            let mut lcd = Lcd::new();
            if let Err(e) = lcd.init() {
                // Keep running headless; control continues regardless.
                error!("display: LCD init failed ({e}), rendering disabled");
            }
            run(&states, lcd);
        },
    )
}

/// Task body, public so integration tests can run it against mock ports.
pub fn run(states: &LatestSlot<ThermostatState>, mut display: impl DisplayPort) {
    let watchdog = Watchdog::register("display");

    loop {
        let state = states.recv();
        if let Err(e) = display.render(&state) {
            error!("display: render failed ({e}), skipping cycle");
        }
        watchdog.feed();
    }
}
