//! Application core — pure domain logic, zero I/O.
//!
//! Holds the command handler that turns accepted user intents into
//! configuration and mode changes, plus the port traits the task layer uses
//! to reach hardware.  Everything here is fully testable without real
//! peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
