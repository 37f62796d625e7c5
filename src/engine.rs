//! Thermostat decision engine.
//!
//! Converts a temperature sample plus the current configuration into an
//! output command and a complete state snapshot.  The engine is the single
//! writer of the snapshot; every other task observes copies delivered
//! through the state publisher.
//!
//! ## Hysteresis rules
//!
//! With `lo = setpoint − hysteresis` and `hi = setpoint + hysteresis`:
//!
//! | Mode | below `lo` | above `hi` | inside band        |
//! |------|-----------|-----------|---------------------|
//! | Off  | Off       | Off       | Off                 |
//! | Heat | HeatOn    | Off       | previous output     |
//! | Cool | Off       | CoolOn    | previous output     |
//! | Auto | HeatOn    | CoolOn    | Off                 |
//!
//! Comparisons are strict: a temperature exactly on a band edge is *not* a
//! crossing, so sitting on the boundary never toggles the output.
//!
//! Heat and Cool retain the previous output inside the band (deadband
//! memory — the property that prevents relay chatter around the setpoint).
//! Auto deliberately does not: inside the band it resolves to Off even if
//! the previous cycle was actively heating or cooling.  The asymmetry is
//! intended behaviour, not an oversight.

use std::sync::Arc;

use serde::Serialize;

use crate::config::ThermostatConfig;
use crate::store::ConfigStore;

// ---------------------------------------------------------------------------
// Core value types
// ---------------------------------------------------------------------------

/// One temperature reading from the sensor pair.  Immutable once produced;
/// moved between tasks by value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSample {
    /// Indoor temperature (°C) — the only input to the control decision.
    pub indoor_c: f32,
    /// Outdoor temperature (°C) — display / telemetry only.
    pub outdoor_c: f32,
    /// Monotonic milliseconds since boot at read time.
    pub timestamp_ms: u32,
}

/// High-level operating mode selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Off,
    Heat,
    Cool,
    Auto,
}

impl OperatingMode {
    /// Next mode in the UI cycle: Heat → Cool → Off → Auto → Heat.
    pub fn next(self) -> Self {
        match self {
            Self::Heat => Self::Cool,
            Self::Cool => Self::Off,
            Self::Off => Self::Auto,
            Self::Auto => Self::Heat,
        }
    }
}

/// Abstract actuation command.  Mapping to physical relay levels belongs to
/// the output driver, never to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCommand {
    Off,
    HeatOn,
    CoolOn,
}

/// Complete snapshot of the thermostat after one decision.
///
/// Rebuilt whole on every processed sample; consumers can never observe a
/// partially-updated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermostatState {
    pub mode: OperatingMode,
    pub output: OutputCommand,
    pub setpoint_c: f32,
    pub hysteresis_c: f32,
    pub indoor_c: f32,
    pub outdoor_c: f32,
    pub timestamp_ms: u32,
}

// ---------------------------------------------------------------------------
// Decision function
// ---------------------------------------------------------------------------

/// Pure hysteresis decision: (mode, previous output, indoor temperature,
/// configuration) → new output.
fn decide(
    mode: OperatingMode,
    prev: OutputCommand,
    indoor_c: f32,
    cfg: &ThermostatConfig,
) -> OutputCommand {
    let lo = cfg.setpoint_c - cfg.hysteresis_c;
    let hi = cfg.setpoint_c + cfg.hysteresis_c;

    match mode {
        OperatingMode::Off => OutputCommand::Off,

        OperatingMode::Heat => {
            if indoor_c < lo {
                OutputCommand::HeatOn
            } else if indoor_c > hi {
                OutputCommand::Off
            } else {
                prev
            }
        }

        OperatingMode::Cool => {
            if indoor_c > hi {
                OutputCommand::CoolOn
            } else if indoor_c < lo {
                OutputCommand::Off
            } else {
                prev
            }
        }

        OperatingMode::Auto => {
            if indoor_c < lo {
                OutputCommand::HeatOn
            } else if indoor_c > hi {
                OutputCommand::CoolOn
            } else {
                OutputCommand::Off
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the deadband memory (previous output) and the latest snapshot.
///
/// Shared between the control task (`process_sample`) and the buttons task
/// (`set_mode` / `mode`) behind a `Mutex`; the lock is held only for the
/// short synchronous decision, never across logging or I/O.
pub struct ThermostatEngine {
    store: Arc<ConfigStore>,
    state: ThermostatState,
}

impl ThermostatEngine {
    /// Construct with Heat mode and all outputs off — the engine never
    /// starts in an active output state.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        let cfg = store.get().unwrap_or_default();
        Self {
            store,
            state: ThermostatState {
                mode: OperatingMode::Heat,
                output: OutputCommand::Off,
                setpoint_c: cfg.setpoint_c,
                hysteresis_c: cfg.hysteresis_c,
                indoor_c: 0.0,
                outdoor_c: 0.0,
                timestamp_ms: 0,
            },
        }
    }

    /// Run one control decision and return the updated snapshot.
    ///
    /// Reads the live configuration; if the store read fails the
    /// compile-time defaults are substituted so control never halts on a
    /// configuration subsystem hiccup.
    pub fn process_sample(&mut self, sample: &SensorSample) -> ThermostatState {
        let cfg = self.store.get().unwrap_or_default();

        let output = decide(self.state.mode, self.state.output, sample.indoor_c, &cfg);

        self.state = ThermostatState {
            mode: self.state.mode,
            output,
            setpoint_c: cfg.setpoint_c,
            hysteresis_c: cfg.hysteresis_c,
            indoor_c: sample.indoor_c,
            outdoor_c: sample.outdoor_c,
            timestamp_ms: sample.timestamp_ms,
        };

        self.state
    }

    /// Switch operating mode.
    ///
    /// Entering Off is a fail-safe transition: the output is forced off
    /// immediately rather than waiting for the next sample.
    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.state.mode = mode;
        if mode == OperatingMode::Off {
            self.state.output = OutputCommand::Off;
        }
    }

    /// Current operating mode.
    pub fn mode(&self) -> OperatingMode {
        self.state.mode
    }

    /// Copy of the latest snapshot without processing a sample.
    pub fn snapshot(&self) -> ThermostatState {
        self.state
    }
}
