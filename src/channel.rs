//! Freshest-wins inter-task channels.
//!
//! Control correctness depends only on the *newest* value — a backlog of
//! stale temperature samples or state snapshots would make the actuators lag
//! reality.  Both the sensor→control relay and the control→{display,
//! telemetry} fan-out therefore use a single-slot cell that overwrites any
//! unconsumed value on publish:
//!
//! ```text
//! ┌──────────┐ publish (never blocks)  ┌────────────┐ recv (blocks)  ┌──────────┐
//! │ producer │────────────────────────▶│ LatestSlot │───────────────▶│ consumer │
//! └──────────┘   old value discarded   └────────────┘                └──────────┘
//! ```
//!
//! A slot supports exactly one logical consumer.  Where several independent
//! tasks observe the same stream (display and telemetry both watching the
//! thermostat state), [`Publisher`] fans a publish out to one slot per
//! subscriber, so a slow consumer only ever delays *itself* and still sees
//! the latest value when it catches up.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Receive timeout
// ---------------------------------------------------------------------------

/// Bounded wait expired with no value published.
///
/// Not a failure: consumers that must not block forever (telemetry) treat
/// this as a first-class outcome, log it, and retry on the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvTimeout;

impl core::fmt::Display for RecvTimeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "receive timed out")
    }
}

// ---------------------------------------------------------------------------
// LatestSlot
// ---------------------------------------------------------------------------

/// Single-value overwrite-on-publish cell with blocking receive.
///
/// At most one value is ever pending; publishing while a value is still
/// unconsumed discards the old one.  Values are consumed by `recv`, so a
/// consumer never observes the same publication twice.
pub struct LatestSlot<T> {
    slot: Mutex<Option<T>>,
    available: Condvar,
}

impl<T> LatestSlot<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            available: Condvar::new(),
        }
    }

    /// Replace the pending value (if any) and wake the consumer.
    /// Never blocks beyond the duration of the swap itself.
    pub fn publish(&self, value: T) {
        let mut slot = self.lock_slot();
        *slot = Some(value);
        drop(slot);
        self.available.notify_one();
    }

    /// Block until a value is available, then consume it.
    pub fn recv(&self) -> T {
        let mut slot = self.lock_slot();
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            slot = self
                .available
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Block until a value is available or `timeout` elapses.
    pub fn recv_timeout(&self, timeout: Duration) -> core::result::Result<T, RecvTimeout> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock_slot();
        loop {
            if let Some(value) = slot.take() {
                return Ok(value);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(RecvTimeout);
            }
            slot = self
                .available
                .wait_timeout(slot, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    // A panicked publisher cannot tear the Option; recover the guard.
    fn lock_slot(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Publisher (fan-out to N independent slots)
// ---------------------------------------------------------------------------

use std::sync::Arc;

/// Fans one publish out to every subscribed [`LatestSlot`].
///
/// Subscriptions are created at composition time, before tasks start; the
/// publisher is then moved into the producing task.
pub struct Publisher<T> {
    subscribers: Vec<Arc<LatestSlot<T>>>,
}

impl<T: Clone> Publisher<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Create a new subscription. The returned slot is this consumer's
    /// private at-most-one-pending channel.
    pub fn subscribe(&mut self) -> Arc<LatestSlot<T>> {
        let slot = Arc::new(LatestSlot::new());
        self.subscribers.push(Arc::clone(&slot));
        slot
    }

    /// Deliver `value` to every subscriber, overwriting unconsumed values.
    pub fn publish(&self, value: &T) {
        for slot in &self.subscribers {
            slot.publish(value.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}
