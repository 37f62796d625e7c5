//! Shared thermostat configuration store.
//!
//! The one piece of state mutated by more than one task: the buttons task
//! writes setpoint adjustments, the decision engine reads the current
//! configuration on every sample.  All access goes through a mutex held only
//! for the duration of a struct copy — no logging or I/O happens under the
//! lock, so even the highest-priority caller is blocked for nanoseconds at
//! worst.
//!
//! Consumers always receive a full copy; a torn read (setpoint from one
//! update, hysteresis from another) is impossible.

use std::sync::Mutex;

use crate::config::ThermostatConfig;
use crate::error::{Error, Result};

/// Mutex-guarded owner of the live [`ThermostatConfig`].
///
/// Constructed once by the composition root and shared as an `Arc`.
pub struct ConfigStore {
    cfg: Mutex<ThermostatConfig>,
}

impl ConfigStore {
    /// Create a store holding `initial`.
    pub fn new(initial: ThermostatConfig) -> Self {
        Self {
            cfg: Mutex::new(initial),
        }
    }

    /// Create a store holding the compile-time defaults.
    pub fn with_defaults() -> Self {
        Self::new(ThermostatConfig::default())
    }

    /// Full, consistent copy of the current configuration.
    ///
    /// Fails only if a writer panicked while holding the lock; callers are
    /// expected to fall back to compile-time defaults rather than stop.
    pub fn get(&self) -> Result<ThermostatConfig> {
        let guard = self.cfg.lock().map_err(|_| Error::ConfigRead)?;
        Ok(*guard)
    }

    /// Atomically replace the stored configuration.
    ///
    /// Does **not** clamp — bounding the setpoint is the command handler's
    /// job, applied before calling `set`.
    pub fn set(&self, new_cfg: ThermostatConfig) -> Result<()> {
        let mut guard = self.cfg.lock().map_err(|_| Error::ConfigRead)?;
        *guard = new_cfg;
        Ok(())
    }
}
