//! Heat/cool relay output driver.
//!
//! Two independent binary outputs drive the heating and cooling contactors.
//! The driver is the last line of defence for the "never both energised"
//! rule: whatever command sequence arrives, it de-energises the opposing
//! relay *before* energising the requested one (break-before-make).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the two GPIOs via hw_init.  On host/test: tracks the
//! commanded levels in-memory for assertions.

use log::warn;

use crate::app::ports::OutputPort;
use crate::drivers::hw_init;
use crate::engine::OutputCommand;
use crate::pins;

pub struct RelayOutputs {
    heat_on: bool,
    cool_on: bool,
}

impl RelayOutputs {
    /// Construct with both relays driven off.
    pub fn new() -> Self {
        hw_init::gpio_write(pins::HEAT_OUTPUT_GPIO, false);
        hw_init::gpio_write(pins::COOL_OUTPUT_GPIO, false);
        Self {
            heat_on: false,
            cool_on: false,
        }
    }

    pub fn heat_on(&self) -> bool {
        self.heat_on
    }

    pub fn cool_on(&self) -> bool {
        self.cool_on
    }

    fn set_heat(&mut self, on: bool) {
        if self.heat_on != on {
            hw_init::gpio_write(pins::HEAT_OUTPUT_GPIO, on);
            self.heat_on = on;
        }
    }

    fn set_cool(&mut self, on: bool) {
        if self.cool_on != on {
            hw_init::gpio_write(pins::COOL_OUTPUT_GPIO, on);
            self.cool_on = on;
        }
    }
}

impl OutputPort for RelayOutputs {
    fn apply(&mut self, command: OutputCommand) {
        match command {
            OutputCommand::Off => {
                self.set_heat(false);
                self.set_cool(false);
            }
            OutputCommand::HeatOn => {
                // Break-before-make: opposing relay released first.
                self.set_cool(false);
                self.set_heat(true);
            }
            OutputCommand::CoolOn => {
                self.set_heat(false);
                self.set_cool(true);
            }
        }

        if self.heat_on && self.cool_on {
            // Unreachable by construction; trip loudly if a refactor breaks it.
            warn!("relay: both outputs commanded, forcing all off");
            self.all_off();
        }
    }

    fn all_off(&mut self) {
        self.set_heat(false);
        self.set_cool(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_with_both_relays_off() {
        let relays = RelayOutputs::new();
        assert!(!relays.heat_on());
        assert!(!relays.cool_on());
    }

    #[test]
    fn commands_map_to_exclusive_outputs() {
        let mut relays = RelayOutputs::new();

        relays.apply(OutputCommand::HeatOn);
        assert!(relays.heat_on() && !relays.cool_on());

        relays.apply(OutputCommand::CoolOn);
        assert!(!relays.heat_on() && relays.cool_on());

        relays.apply(OutputCommand::Off);
        assert!(!relays.heat_on() && !relays.cool_on());
    }

    #[test]
    fn never_both_active_over_any_sequence() {
        let mut relays = RelayOutputs::new();
        let sequence = [
            OutputCommand::HeatOn,
            OutputCommand::HeatOn,
            OutputCommand::CoolOn,
            OutputCommand::Off,
            OutputCommand::CoolOn,
            OutputCommand::HeatOn,
            OutputCommand::Off,
        ];
        for cmd in sequence {
            relays.apply(cmd);
            assert!(
                !(relays.heat_on() && relays.cool_on()),
                "both relays energised after {cmd:?}"
            );
        }
    }

    #[test]
    fn all_off_is_idempotent() {
        let mut relays = RelayOutputs::new();
        relays.apply(OutputCommand::HeatOn);
        relays.all_off();
        relays.all_off();
        assert!(!relays.heat_on() && !relays.cool_on());
    }
}
