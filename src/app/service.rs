//! Mode/setpoint command handler.
//!
//! Applies bounded setpoint adjustments through the configuration store and
//! cycles the operating mode on the decision engine.  Every failure is
//! reported and the affected command dropped — user input must never be
//! able to stall or crash the control path.

use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};

use crate::config::{SP_MAX_C, SP_MIN_C, SP_STEP_C};
use crate::engine::ThermostatEngine;
use crate::store::ConfigStore;

use super::commands::Command;

/// Serialises user intents into configuration and engine mutations.
pub struct CommandHandler {
    store: Arc<ConfigStore>,
    engine: Arc<Mutex<ThermostatEngine>>,
}

impl CommandHandler {
    pub fn new(store: Arc<ConfigStore>, engine: Arc<Mutex<ThermostatEngine>>) -> Self {
        Self { store, engine }
    }

    /// Dispatch one accepted (already debounced) command.
    pub fn handle(&self, cmd: Command) {
        match cmd {
            Command::RaiseSetpoint => self.adjust_setpoint(SP_STEP_C),
            Command::LowerSetpoint => self.adjust_setpoint(-SP_STEP_C),
            Command::CycleMode => self.cycle_mode(),
        }
    }

    /// Read-modify-write the setpoint, clamped to the legal range.
    ///
    /// Clamping happens here, before the store write — the store itself
    /// never mutates what it is given.
    pub fn adjust_setpoint(&self, delta_c: f32) {
        let mut cfg = match self.store.get() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("setpoint adjust skipped: {e}");
                return;
            }
        };

        cfg.setpoint_c = (cfg.setpoint_c + delta_c).clamp(SP_MIN_C, SP_MAX_C);

        if let Err(e) = self.store.set(cfg) {
            warn!("setpoint adjust skipped: {e}");
            return;
        }

        info!(
            "setpoint changed to {:.1} C (delta {:+.1})",
            cfg.setpoint_c, delta_c
        );
    }

    /// Advance the operating mode one step: Heat → Cool → Off → Auto → Heat.
    pub fn cycle_mode(&self) {
        let next = {
            let mut engine = self
                .engine
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let next = engine.mode().next();
            engine.set_mode(next);
            next
        };
        info!("mode cycled to {next:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThermostatConfig;
    use crate::engine::{OperatingMode, OutputCommand, SensorSample};

    fn make_handler() -> (CommandHandler, Arc<ConfigStore>, Arc<Mutex<ThermostatEngine>>) {
        let store = Arc::new(ConfigStore::with_defaults());
        let engine = Arc::new(Mutex::new(ThermostatEngine::new(Arc::clone(&store))));
        (
            CommandHandler::new(Arc::clone(&store), Arc::clone(&engine)),
            store,
            engine,
        )
    }

    #[test]
    fn raise_and_lower_move_by_one_step() {
        let (handler, store, _) = make_handler();
        let before = store.get().unwrap().setpoint_c;

        handler.handle(Command::RaiseSetpoint);
        let up = store.get().unwrap().setpoint_c;
        assert!((up - before - SP_STEP_C).abs() < f32::EPSILON);

        handler.handle(Command::LowerSetpoint);
        let back = store.get().unwrap().setpoint_c;
        assert!((back - before).abs() < f32::EPSILON);
    }

    #[test]
    fn repeated_raises_converge_to_max_and_stay() {
        let (handler, store, _) = make_handler();
        for _ in 0..100 {
            handler.adjust_setpoint(SP_STEP_C);
        }
        assert!((store.get().unwrap().setpoint_c - SP_MAX_C).abs() < f32::EPSILON);

        // Once at the bound, further presses are absorbed.
        handler.adjust_setpoint(SP_STEP_C);
        assert!((store.get().unwrap().setpoint_c - SP_MAX_C).abs() < f32::EPSILON);
    }

    #[test]
    fn repeated_lowers_converge_to_min_and_stay() {
        let (handler, store, _) = make_handler();
        for _ in 0..100 {
            handler.adjust_setpoint(-SP_STEP_C);
        }
        assert!((store.get().unwrap().setpoint_c - SP_MIN_C).abs() < f32::EPSILON);

        handler.adjust_setpoint(-SP_STEP_C);
        assert!((store.get().unwrap().setpoint_c - SP_MIN_C).abs() < f32::EPSILON);
    }

    #[test]
    fn huge_delta_is_clamped_in_one_step() {
        let (handler, store, _) = make_handler();
        handler.adjust_setpoint(1_000.0);
        assert!((store.get().unwrap().setpoint_c - SP_MAX_C).abs() < f32::EPSILON);
        handler.adjust_setpoint(-1_000.0);
        assert!((store.get().unwrap().setpoint_c - SP_MIN_C).abs() < f32::EPSILON);
    }

    #[test]
    fn hysteresis_untouched_by_setpoint_adjust() {
        let (handler, store, _) = make_handler();
        store
            .set(ThermostatConfig {
                setpoint_c: 20.0,
                hysteresis_c: 0.75,
            })
            .unwrap();
        handler.adjust_setpoint(SP_STEP_C);
        assert!((store.get().unwrap().hysteresis_c - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn four_cycles_return_to_start_from_any_mode() {
        for start in [
            OperatingMode::Heat,
            OperatingMode::Cool,
            OperatingMode::Off,
            OperatingMode::Auto,
        ] {
            let (handler, _, engine) = make_handler();
            engine.lock().unwrap().set_mode(start);
            for _ in 0..4 {
                handler.cycle_mode();
            }
            assert_eq!(engine.lock().unwrap().mode(), start);
        }
    }

    #[test]
    fn cycling_into_off_kills_an_active_output() {
        let (handler, _, engine) = make_handler();
        {
            let mut eng = engine.lock().unwrap();
            eng.set_mode(OperatingMode::Cool);
            eng.process_sample(&SensorSample {
                indoor_c: 30.0,
                outdoor_c: 30.0,
                timestamp_ms: 0,
            });
            assert_eq!(eng.snapshot().output, OutputCommand::CoolOn);
        }

        // Cool → Off.
        handler.cycle_mode();
        let eng = engine.lock().unwrap();
        assert_eq!(eng.mode(), OperatingMode::Off);
        assert_eq!(eng.snapshot().output, OutputCommand::Off);
    }
}
