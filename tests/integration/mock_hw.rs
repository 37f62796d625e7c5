//! Mock hardware adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history without
//! touching real GPIO or network sockets.  Mutable state is shared through
//! `Arc<Mutex<_>>` so a mock can be handed to a spawned task while the
//! test keeps an inspection handle.

use std::sync::{Arc, Mutex};

use hearthstat::app::ports::{DisplayPort, OutputPort, TelemetryPort};
use hearthstat::engine::{OutputCommand, ThermostatState};
use hearthstat::{CommsError, DisplayError};

// ── Output port ───────────────────────────────────────────────

/// Records every actuation command.
#[derive(Clone, Default)]
pub struct MockOutputs {
    pub applied: Arc<Mutex<Vec<OutputCommand>>>,
}

impl MockOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_applied(&self) -> Option<OutputCommand> {
        self.applied.lock().unwrap().last().copied()
    }

    pub fn applied(&self) -> Vec<OutputCommand> {
        self.applied.lock().unwrap().clone()
    }
}

impl OutputPort for MockOutputs {
    fn apply(&mut self, command: OutputCommand) {
        self.applied.lock().unwrap().push(command);
    }

    fn all_off(&mut self) {
        self.applied.lock().unwrap().push(OutputCommand::Off);
    }
}

// ── Display port ──────────────────────────────────────────────

/// Records rendered snapshots; optionally fails every render.
#[derive(Clone, Default)]
pub struct MockDisplay {
    pub rendered: Arc<Mutex<Vec<ThermostatState>>>,
    pub fail: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }

    pub fn last_rendered(&self) -> Option<ThermostatState> {
        self.rendered.lock().unwrap().last().copied()
    }
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, state: &ThermostatState) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::BusWriteFailed);
        }
        self.rendered.lock().unwrap().push(*state);
        Ok(())
    }
}

// ── Telemetry port ────────────────────────────────────────────

/// Records every JSON payload handed to `send`; optionally fails them all.
#[derive(Clone, Default)]
pub struct MockTransport {
    pub payloads: Arc<Mutex<Vec<String>>>,
    pub attempts: Arc<Mutex<usize>>,
    pub fail: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl TelemetryPort for MockTransport {
    fn send(&mut self, json: &str) -> Result<(), CommsError> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(CommsError::HttpRequestFailed);
        }
        self.payloads.lock().unwrap().push(json.to_string());
        Ok(())
    }
}
