//! System configuration parameters
//!
//! All tunable parameters for the HearthStat thermostat: the runtime
//! control configuration (setpoint / hysteresis band), the compile-time
//! defaults it falls back to, and the task timing / priority table.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Setpoint limits (user adjustments are clamped to this range)
// ---------------------------------------------------------------------------

/// Lowest setpoint the UI can select (°C).
pub const SP_MIN_C: f32 = 15.0;
/// Highest setpoint the UI can select (°C).
pub const SP_MAX_C: f32 = 28.0;
/// Setpoint change per button press (°C).
pub const SP_STEP_C: f32 = 0.5;

/// Compile-time default setpoint (°C). Used at first boot and as the
/// fallback whenever the configuration store cannot be read.
pub const DEFAULT_SETPOINT_C: f32 = 21.0;
/// Compile-time default hysteresis half-band (°C).
pub const DEFAULT_HYSTERESIS_C: f32 = 0.5;

// ---------------------------------------------------------------------------
// Runtime control configuration
// ---------------------------------------------------------------------------

/// Thermostat control configuration.
///
/// Owned by the [`ConfigStore`](crate::store::ConfigStore); every other
/// component only ever sees full copies of this struct, never references
/// into the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermostatConfig {
    /// Desired indoor temperature (°C).
    pub setpoint_c: f32,
    /// Deadband half-width around the setpoint (°C, ≥ 0).
    pub hysteresis_c: f32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            setpoint_c: DEFAULT_SETPOINT_C,
            hysteresis_c: DEFAULT_HYSTERESIS_C,
        }
    }
}

// ---------------------------------------------------------------------------
// Task timing
// ---------------------------------------------------------------------------

/// Sensor sampling period (milliseconds).
pub const PERIOD_SENSORS_MS: u64 = 500;
/// Button event drain period (milliseconds).
pub const PERIOD_BUTTONS_MS: u64 = 25;
/// Heartbeat LED half-period (milliseconds).
pub const PERIOD_HEARTBEAT_MS: u64 = 500;
/// Telemetry consumer gives up waiting for a state update after this long.
pub const TELEMETRY_RECV_TIMEOUT_MS: u64 = 5_000;
/// Minimum gap between two accepted presses of the same button.
pub const BUTTON_DEBOUNCE_MS: u32 = 200;

// ---------------------------------------------------------------------------
// Task priorities and stacks (FreeRTOS, via pthread config)
// ---------------------------------------------------------------------------

pub const TASK_PRIO_SENSORS: u8 = 6;
pub const TASK_PRIO_CONTROL: u8 = 10;
pub const TASK_PRIO_DISPLAY: u8 = 4;
pub const TASK_PRIO_TELEMETRY: u8 = 3;
pub const TASK_PRIO_BUTTONS: u8 = 7;

pub const TASK_STACK_SENSORS_KB: usize = 4;
pub const TASK_STACK_CONTROL_KB: usize = 6;
pub const TASK_STACK_DISPLAY_KB: usize = 4;
pub const TASK_STACK_TELEMETRY_KB: usize = 10;
pub const TASK_STACK_BUTTONS_KB: usize = 4;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Wi-Fi station credentials. Compile-time for now; provisioning over a
/// local setup channel replaces these in a later board revision.
pub const WIFI_SSID: &str = "hearthstat-home";
pub const WIFI_PASS: &str = "change-me-before-flashing";

/// Telemetry ingestion endpoint (plain HTTP on the LAN collector).
pub const TELEMETRY_URL: &str = "http://192.168.4.10:8086/ingest";
