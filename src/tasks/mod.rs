//! Task bodies — one module per FreeRTOS task.
//!
//! Each module exposes a `spawn` function that pins the task to a core
//! with its configured priority and stack (via
//! [`task_pin`](crate::drivers::task_pin)) and a `run` body that is plain,
//! port-driven code so host tests can drive it with mock adapters.
//!
//! ```text
//! sensors ──▶ sample relay ──▶ control ──▶ state publisher ──▶ display
//!                                   │                     └──▶ telemetry
//! buttons ──▶ command handler ──▶ config store / engine ◀──────┘ (reads)
//! ```

pub mod buttons;
pub mod control;
pub mod display;
pub mod sensors;
pub mod telemetry;
