//! Sensor sampling task.
//!
//! Periodically reads the thermistor pair and publishes the sample into
//! the freshest-wins relay.  The publish never blocks: if the control task
//! has not consumed the previous sample yet, the stale one is discarded —
//! old temperatures are worthless for control.
//!
//! A failed driver read is reported and the cycle skipped; the task never
//! stops.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::adapters::time::SystemClock;
use crate::channel::LatestSlot;
use crate::config::{PERIOD_SENSORS_MS, TASK_PRIO_SENSORS, TASK_STACK_SENSORS_KB};
use crate::drivers::task_pin::{self, Core};
use crate::drivers::temp_sensors::TempSensors;
use crate::drivers::watchdog::Watchdog;
use crate::engine::SensorSample;

pub fn spawn(relay: Arc<LatestSlot<SensorSample>>) -> JoinHandle<()> {
    task_pin::spawn_on_core(
        Core::App,
        TASK_PRIO_SENSORS,
        TASK_STACK_SENSORS_KB,
        "sensors\0",
        move || run(&relay),
    )
}

fn run(relay: &LatestSlot<SensorSample>) {
    let watchdog = Watchdog::register("sensors");
    let clock = SystemClock::new();
    let mut sensors = TempSensors::new();

    // Fixed-cadence schedule: advancing the deadline instead of sleeping a
    // flat period keeps the long-run rate drift-free.
    let period = Duration::from_millis(PERIOD_SENSORS_MS);
    let mut next_wake = Instant::now() + period;

    loop {
        match sensors.read(clock.uptime_ms()) {
            Ok(sample) => {
                relay.publish(sample);
                debug!(
                    "sensors: Tin={:.2}C Tout={:.2}C t={}ms",
                    sample.indoor_c, sample.outdoor_c, sample.timestamp_ms
                );
            }
            Err(e) => {
                error!("sensors: read failed ({e}), skipping cycle");
            }
        }

        watchdog.feed();

        let now = Instant::now();
        if next_wake > now {
            std::thread::sleep(next_wake - now);
        }
        next_wake += period;
    }
}
