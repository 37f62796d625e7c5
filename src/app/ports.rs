//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   task layer ──▶ Port trait ──▶ driver / adapter
//! ```
//!
//! The control, display, and telemetry tasks consume these traits via
//! generics, so every task body runs unmodified against mock adapters in
//! host tests.

use crate::engine::{OutputCommand, ThermostatState};
use crate::error::{CommsError, DisplayError};

// ───────────────────────────────────────────────────────────────
// Actuation port (domain → relay hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the heat/cool contactors.
///
/// Implementations must guarantee the two physical outputs are never
/// energised simultaneously, whatever sequence of commands arrives.
pub trait OutputPort {
    /// Drive the outputs to match `command`.
    fn apply(&mut self, command: OutputCommand);

    /// De-energise everything — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → LCD)
// ───────────────────────────────────────────────────────────────

/// Render a state snapshot for the user.
///
/// A failing display must never stall the rest of the system; callers log
/// the error and skip the cycle.
pub trait DisplayPort {
    fn render(&mut self, state: &ThermostatState) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (domain → network collector)
// ───────────────────────────────────────────────────────────────

/// Deliver one serialised telemetry report.
pub trait TelemetryPort {
    fn send(&mut self, json: &str) -> Result<(), CommsError>;
}
