//! User-command integration: button intents → command handler → config
//! store / engine → visible effect on the next control decision.

use std::sync::{Arc, Mutex};
use std::thread;

use hearthstat::app::commands::Command;
use hearthstat::app::service::CommandHandler;
use hearthstat::channel::{LatestSlot, Publisher};
use hearthstat::config::{SP_MAX_C, SP_MIN_C, ThermostatConfig};
use hearthstat::engine::{
    OperatingMode, OutputCommand, SensorSample, ThermostatEngine, ThermostatState,
};
use hearthstat::store::ConfigStore;
use hearthstat::tasks;

use crate::mock_hw::MockOutputs;
use std::time::Duration;

const RECV_WAIT: Duration = Duration::from_secs(2);

struct Rig {
    store: Arc<ConfigStore>,
    engine: Arc<Mutex<ThermostatEngine>>,
    handler: CommandHandler,
    relay: Arc<LatestSlot<SensorSample>>,
    states: Arc<LatestSlot<ThermostatState>>,
}

fn rig(config: ThermostatConfig) -> Rig {
    let store = Arc::new(ConfigStore::new(config));
    let engine = Arc::new(Mutex::new(ThermostatEngine::new(Arc::clone(&store))));
    let handler = CommandHandler::new(Arc::clone(&store), Arc::clone(&engine));

    let relay = Arc::new(LatestSlot::new());
    let mut publisher = Publisher::new();
    let states = publisher.subscribe();

    let task_engine = Arc::clone(&engine);
    let task_relay = Arc::clone(&relay);
    thread::spawn(move || {
        tasks::control::run(&task_engine, &task_relay, &publisher, MockOutputs::new());
    });

    Rig {
        store,
        engine,
        handler,
        relay,
        states,
    }
}

fn push_sample(rig: &Rig, indoor_c: f32, ts: u32) -> ThermostatState {
    rig.relay.publish(SensorSample {
        indoor_c,
        outdoor_c: 0.0,
        timestamp_ms: ts,
    });
    rig.states.recv_timeout(RECV_WAIT).expect("state not published")
}

#[test]
fn setpoint_change_affects_the_next_decision() {
    let rig = rig(ThermostatConfig {
        setpoint_c: 20.0,
        hysteresis_c: 0.5,
    });

    // 21.0 is above the 20.0 band → no heat.
    let s = push_sample(&rig, 21.0, 1);
    assert_eq!(s.output, OutputCommand::Off);

    // Six raises: 20.0 → 23.0. The same room is now too cold.
    for _ in 0..6 {
        rig.handler.handle(Command::RaiseSetpoint);
    }
    let s = push_sample(&rig, 21.0, 2);
    assert!((s.setpoint_c - 23.0).abs() < f32::EPSILON);
    assert_eq!(s.output, OutputCommand::HeatOn);
}

#[test]
fn held_button_saturates_at_the_bounds() {
    let rig = rig(ThermostatConfig::default());

    for _ in 0..200 {
        rig.handler.handle(Command::RaiseSetpoint);
    }
    assert!((rig.store.get().unwrap().setpoint_c - SP_MAX_C).abs() < f32::EPSILON);

    for _ in 0..200 {
        rig.handler.handle(Command::LowerSetpoint);
    }
    assert!((rig.store.get().unwrap().setpoint_c - SP_MIN_C).abs() < f32::EPSILON);
}

#[test]
fn cycling_to_off_drops_the_output_without_a_new_sample() {
    let rig = rig(ThermostatConfig {
        setpoint_c: 22.0,
        hysteresis_c: 0.5,
    });

    let s = push_sample(&rig, 20.0, 1);
    assert_eq!(s.output, OutputCommand::HeatOn);

    // Heat → Cool → Off.
    rig.handler.handle(Command::CycleMode);
    rig.handler.handle(Command::CycleMode);

    let engine = rig.engine.lock().unwrap();
    assert_eq!(engine.mode(), OperatingMode::Off);
    assert_eq!(
        engine.snapshot().output,
        OutputCommand::Off,
        "entering Off must kill the output immediately"
    );
}

#[test]
fn off_mode_survives_any_temperature() {
    let rig = rig(ThermostatConfig {
        setpoint_c: 22.0,
        hysteresis_c: 0.5,
    });

    rig.engine.lock().unwrap().set_mode(OperatingMode::Off);

    for (i, t) in [-20.0f32, 5.0, 21.9, 35.0].into_iter().enumerate() {
        let s = push_sample(&rig, t, i as u32 + 1);
        assert_eq!(s.output, OutputCommand::Off, "Tin={t}");
    }
}

#[test]
fn mode_cycle_returns_home_and_resumes_control() {
    let rig = rig(ThermostatConfig {
        setpoint_c: 22.0,
        hysteresis_c: 0.5,
    });

    for _ in 0..4 {
        rig.handler.handle(Command::CycleMode);
    }
    assert_eq!(rig.engine.lock().unwrap().mode(), OperatingMode::Heat);

    // Control picks up where it left off.
    let s = push_sample(&rig, 19.0, 1);
    assert_eq!(s.output, OutputCommand::HeatOn);
}
