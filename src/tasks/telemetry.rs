//! Telemetry task.
//!
//! Waits (bounded) on its state subscription, serialises each delivered
//! snapshot, and POSTs it to the collector while WiFi is up.  A report is
//! sent for every state delivery — once per sample period — rather than
//! once per connectivity session; stale dashboards are exactly what this
//! consumer exists to prevent.
//!
//! The 5 s receive timeout keeps the task responsive when the control task
//! stalls: it logs the gap, feeds its watchdog, and retries, instead of
//! blocking forever on a channel that may never fire again.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info, warn};

use crate::adapters::device_id;
use crate::adapters::time::SystemClock;
use crate::adapters::wifi::{ConnectivityPort, WifiAdapter};
use crate::app::events::TelemetryReport;
use crate::app::ports::TelemetryPort;
use crate::channel::LatestSlot;
use crate::config::{
    TASK_PRIO_TELEMETRY, TASK_STACK_TELEMETRY_KB, TELEMETRY_RECV_TIMEOUT_MS, WIFI_PASS, WIFI_SSID,
};
use crate::drivers::task_pin::{self, Core};
use crate::drivers::watchdog::Watchdog;
use crate::engine::ThermostatState;

pub fn spawn(
    states: Arc<LatestSlot<ThermostatState>>,
    transport: impl TelemetryPort + Send + 'static,
) -> JoinHandle<()> {
    task_pin::spawn_on_core(
        Core::Pro,
        TASK_PRIO_TELEMETRY,
        TASK_STACK_TELEMETRY_KB,
        "telemetry\0",
        move || {
            let mut wifi = WifiAdapter::new();
            if let Err(e) = wifi.set_credentials(WIFI_SSID, WIFI_PASS) {
                warn!("telemetry: bad WiFi credentials ({e}), running offline");
            } else if let Err(e) = wifi.connect() {
                warn!("telemetry: WiFi connect failed ({e}), will keep retrying");
            }
            let clock = SystemClock::with_sntp();
            run(&states, wifi, transport, &clock);
        },
    )
}

/// Task body, public so integration tests can run it against mock ports.
pub fn run(
    states: &LatestSlot<ThermostatState>,
    mut wifi: impl ConnectivityPort,
    mut transport: impl TelemetryPort,
    clock: &SystemClock,
) {
    let watchdog = Watchdog::register("telemetry");
    let dev_id = device_id::device_id(&device_id::read_mac());
    let timeout = Duration::from_millis(TELEMETRY_RECV_TIMEOUT_MS);

    loop {
        match states.recv_timeout(timeout) {
            Ok(state) => {
                wifi.poll();
                if wifi.is_connected() {
                    send_report(&state, &dev_id, &mut transport, clock);
                } else {
                    debug!("telemetry: offline, report skipped");
                }
            }
            Err(_) => {
                warn!(
                    "telemetry: no state update within {}s, retrying",
                    timeout.as_secs()
                );
            }
        }
        watchdog.feed();
    }
}

fn send_report(
    state: &ThermostatState,
    dev_id: &device_id::DeviceIdString,
    transport: &mut impl TelemetryPort,
    clock: &SystemClock,
) {
    let timestamp = clock.now_iso8601();
    if timestamp.is_none() {
        // Clock still syncing; send the report anyway, the collector can
        // fall back to arrival time.
        debug!("telemetry: wall clock not set, omitting timestamp");
    }

    let report = TelemetryReport::from_state(state, dev_id, timestamp);
    let json = match serde_json::to_string(&report) {
        Ok(json) => json,
        Err(e) => {
            warn!("telemetry: serialisation failed ({e}), report dropped");
            return;
        }
    };

    match transport.send(&json) {
        Ok(()) => info!(
            "telemetry: report sent (mode={:?} output={:?} Tin={:.2}C)",
            state.mode, state.output, state.indoor_c
        ),
        Err(e) => warn!("telemetry: send failed ({e}), will retry next cycle"),
    }
}
