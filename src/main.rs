//! HearthStat Firmware — Main Entry Point
//!
//! Composition root: constructs every shared object, wires the channels,
//! spawns the tasks, then settles into the heartbeat loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ main (composition root + heartbeat)                        │
//! │                                                            │
//! │  ConfigStore ◀── CommandHandler ◀── buttons task           │
//! │      │                 │                                   │
//! │      ▼                 ▼                                   │
//! │  ThermostatEngine (Mutex) ◀── control task ◀── sensors task│
//! │                                │ sample relay (1-slot)     │
//! │                                ▼                           │
//! │                        state publisher ──▶ display task    │
//! │                                        └─▶ telemetry task  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! No domain state lives in statics; every task receives its handles from
//! here.  Only failures that would leave the system without its safety
//! primitives are fatal — everything else logs and degrades.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod app;
pub mod channel;
pub mod config;
pub mod engine;
pub mod store;
pub mod tasks;

mod error;
mod pins;

pub mod adapters;
pub mod drivers;

// ── Imports ───────────────────────────────────────────────────
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use adapters::device_id;
use adapters::http::HttpTelemetry;
use app::service::CommandHandler;
use channel::{LatestSlot, Publisher};
use config::{PERIOD_HEARTBEAT_MS, TELEMETRY_URL};
use drivers::relay::RelayOutputs;
use drivers::status_led::HeartbeatLed;
use drivers::watchdog::{self, Watchdog};
use engine::ThermostatEngine;
use store::ConfigStore;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!(
        "HearthStat v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    // ── 2. Peripherals and safety primitives ──────────────────
    // Peripheral init failure is fatal: a half-configured relay bus could
    // leave a contactor floating. Bubble up and reset.
    drivers::hw_init::init_peripherals()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("peripheral init failed")?;
    drivers::buttons::init().context("button init failed")?;
    watchdog::configure();

    // ── 3. Device identity ────────────────────────────────────
    let dev_id = device_id::device_id(&device_id::read_mac());
    info!("Device ID: {}", dev_id);

    // ── 4. Shared state (owned here, handed out as Arcs) ──────
    let store = Arc::new(ConfigStore::with_defaults());
    let engine = Arc::new(Mutex::new(ThermostatEngine::new(Arc::clone(&store))));

    let sample_relay = Arc::new(LatestSlot::new());
    let mut state_publisher = Publisher::new();
    let display_states = state_publisher.subscribe();
    let telemetry_states = state_publisher.subscribe();

    // ── 5. Spawn tasks ────────────────────────────────────────
    let _sensors = tasks::sensors::spawn(Arc::clone(&sample_relay));
    let _control = tasks::control::spawn(
        Arc::clone(&engine),
        sample_relay,
        state_publisher,
        RelayOutputs::new(),
    );
    let _display = tasks::display::spawn(display_states);
    let _telemetry = tasks::telemetry::spawn(telemetry_states, HttpTelemetry::new(TELEMETRY_URL));
    let _buttons = tasks::buttons::spawn(CommandHandler::new(store, engine));

    info!("System ready. All tasks running.");

    // ── 6. Heartbeat loop ─────────────────────────────────────
    let watchdog = Watchdog::register("main");
    let mut led = HeartbeatLed::new();

    loop {
        led.toggle();
        watchdog.feed();
        std::thread::sleep(Duration::from_millis(PERIOD_HEARTBEAT_MS));
    }
}
