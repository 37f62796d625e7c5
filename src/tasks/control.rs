//! Control task — drives the decision engine.
//!
//! Blocks on the sample relay, runs one engine decision per delivered
//! sample, applies the abstract output to the relay hardware, and fans the
//! resulting snapshot out to every state subscriber.  Samples are
//! processed strictly in delivery order; the overwrite-on-full relay means
//! the task may skip readings under load but never sees them reordered or
//! duplicated.
//!
//! The engine lock is held only for the decision itself — logging and
//! actuation happen after it is released.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use log::{debug, info};

use crate::app::ports::OutputPort;
use crate::channel::{LatestSlot, Publisher};
use crate::config::{TASK_PRIO_CONTROL, TASK_STACK_CONTROL_KB};
use crate::drivers::task_pin::{self, Core};
use crate::drivers::watchdog::Watchdog;
use crate::engine::{OutputCommand, SensorSample, ThermostatEngine, ThermostatState};

pub fn spawn(
    engine: Arc<Mutex<ThermostatEngine>>,
    samples: Arc<LatestSlot<SensorSample>>,
    states: Publisher<ThermostatState>,
    outputs: impl OutputPort + Send + 'static,
) -> JoinHandle<()> {
    task_pin::spawn_on_core(
        Core::App,
        TASK_PRIO_CONTROL,
        TASK_STACK_CONTROL_KB,
        "control\0",
        move || run(&engine, &samples, &states, outputs),
    )
}

/// Task body, public so integration tests can run it against mock ports.
pub fn run(
    engine: &Mutex<ThermostatEngine>,
    samples: &LatestSlot<SensorSample>,
    states: &Publisher<ThermostatState>,
    mut outputs: impl OutputPort,
) {
    let watchdog = Watchdog::register("control");

    // Relays start de-energised; mirror that for change detection.
    outputs.all_off();
    let mut prev_output = OutputCommand::Off;

    loop {
        let sample = samples.recv();

        let state = {
            let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
            engine.process_sample(&sample)
        };

        outputs.apply(state.output);

        if state.output != prev_output {
            info!(
                "control: Tin={:.2}C Tout={:.2}C sp={:.2}C hyst={:.2}C action={:?}",
                state.indoor_c, state.outdoor_c, state.setpoint_c, state.hysteresis_c, state.output
            );
        } else {
            debug!(
                "control: Tin={:.2}C Tout={:.2}C sp={:.2}C hyst={:.2}C keep={:?}",
                state.indoor_c, state.outdoor_c, state.setpoint_c, state.hysteresis_c, state.output
            );
        }
        prev_output = state.output;

        states.publish(&state);
        watchdog.feed();
    }
}
