//! Outbound telemetry report.
//!
//! Built by the telemetry task from a [`ThermostatState`] snapshot and
//! serialised to JSON for the network collector.

use serde::Serialize;

use crate::engine::{OperatingMode, OutputCommand, ThermostatState};

/// One telemetry record as transmitted over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryReport {
    /// Stable device identity (`HS-XXYYZZ`).
    pub device_id: heapless::String<16>,
    pub mode: OperatingMode,
    pub output: OutputCommand,
    pub setpoint_c: f32,
    pub hysteresis_c: f32,
    pub indoor_c: f32,
    pub outdoor_c: f32,
    /// Monotonic milliseconds since boot at sample time.
    pub sampled_at_ms: u32,
    /// RFC-3339 wall-clock timestamp; absent until SNTP has synchronised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TelemetryReport {
    pub fn from_state(
        state: &ThermostatState,
        device_id: &heapless::String<16>,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            device_id: device_id.clone(),
            mode: state.mode,
            output: state.output,
            setpoint_c: state.setpoint_c,
            hysteresis_c: state.hysteresis_c,
            indoor_c: state.indoor_c,
            outdoor_c: state.outdoor_c,
            sampled_at_ms: state.timestamp_ms,
            timestamp,
        }
    }
}
