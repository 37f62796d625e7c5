//! Inbound user commands.
//!
//! Each value represents one *accepted* intent: the buttons task has
//! already debounced the raw edge events before mapping them here, so the
//! handler treats every command as a deliberate user action.

/// Commands the command handler acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Raise the setpoint by one step.
    RaiseSetpoint,
    /// Lower the setpoint by one step.
    LowerSetpoint,
    /// Advance the operating mode one position in the cycle.
    CycleMode,
}
