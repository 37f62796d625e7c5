//! Integration test harness.
//!
//! Runs on the host (x86_64) and exercises the real task bodies, channels,
//! engine, and command handler together, with mock ports standing in for
//! the hardware.

mod mock_hw;

mod command_tests;
mod pipeline_tests;
