//! HD44780 character LCD driver (16x2, 4-bit parallel bus).
//!
//! Classic write-only hookup: RS, EN, and D4-D7 on plain GPIOs, nibble
//! writes clocked by pulsing EN, with ROM delay loops for controller
//! settle times.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the bus via hw_init GPIO writes.  On host/test:
//! captures the rendered lines in-memory so tests can assert on content.

use core::fmt::Write as _;

use heapless::String;
#[cfg(not(target_os = "espidf"))]
use log::debug;

use crate::app::ports::DisplayPort;
use crate::engine::{OperatingMode, OutputCommand, ThermostatState};
use crate::error::DisplayError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

const COLS: usize = 16;

pub struct Lcd {
    initialised: bool,
    #[cfg(not(target_os = "espidf"))]
    last_lines: [String<COLS>; 2],
}

impl Lcd {
    pub fn new() -> Self {
        Self {
            initialised: false,
            #[cfg(not(target_os = "espidf"))]
            last_lines: [String::new(), String::new()],
        }
    }

    /// Run the controller init sequence. Failure leaves the rest of the
    /// system running — the display is not load-bearing.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.platform_init()?;
        self.initialised = true;
        Ok(())
    }

    /// Most recent rendered content, for host tests.
    #[cfg(not(target_os = "espidf"))]
    pub fn lines(&self) -> (&str, &str) {
        (&self.last_lines[0], &self.last_lines[1])
    }

    fn format_lines(state: &ThermostatState) -> (String<COLS>, String<COLS>) {
        let mode = match state.mode {
            OperatingMode::Off => "OFF ",
            OperatingMode::Heat => "HEAT",
            OperatingMode::Cool => "COOL",
            OperatingMode::Auto => "AUTO",
        };
        let output = match state.output {
            OutputCommand::Off => "idle",
            OutputCommand::HeatOn => "heat",
            OutputCommand::CoolOn => "cool",
        };

        let mut top: String<COLS> = String::new();
        let mut bottom: String<COLS> = String::new();
        // Write-through truncation is acceptable on a 16-column panel.
        let _ = write!(top, "In{:5.1} Out{:5.1}", state.indoor_c, state.outdoor_c);
        let _ = write!(bottom, "{} {:4.1}C {}", mode, state.setpoint_c, output);
        (top, bottom)
    }

    // ── ESP-IDF bus implementation ───────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_init(&mut self) -> Result<(), DisplayError> {
        // GPIOs were configured as outputs by hw_init; run the 4-bit
        // mode-switch dance from the HD44780 datasheet.
        hw_init::delay_us(50_000);
        hw_init::gpio_write(pins::LCD_RS_GPIO, false);

        // Force 8-bit mode three times, then drop to 4-bit.
        self.write_nibble(0x03);
        hw_init::delay_us(4_500);
        self.write_nibble(0x03);
        hw_init::delay_us(4_500);
        self.write_nibble(0x03);
        hw_init::delay_us(150);
        self.write_nibble(0x02);
        hw_init::delay_us(150);

        self.command(0x28); // function set: 4-bit, 2 lines, 5x8 font
        self.command(0x08); // display off
        self.command(0x01); // clear
        self.command(0x06); // entry mode: increment, no shift
        self.command(0x0C); // display on, cursor off
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn write_nibble(&mut self, nib: u8) {
        hw_init::gpio_write(pins::LCD_D4_GPIO, nib & 0x01 != 0);
        hw_init::gpio_write(pins::LCD_D5_GPIO, nib & 0x02 != 0);
        hw_init::gpio_write(pins::LCD_D6_GPIO, nib & 0x04 != 0);
        hw_init::gpio_write(pins::LCD_D7_GPIO, nib & 0x08 != 0);

        hw_init::gpio_write(pins::LCD_EN_GPIO, true);
        hw_init::delay_us(1);
        hw_init::gpio_write(pins::LCD_EN_GPIO, false);
        hw_init::delay_us(40);
    }

    #[cfg(target_os = "espidf")]
    fn send(&mut self, value: u8, rs: bool) {
        hw_init::gpio_write(pins::LCD_RS_GPIO, rs);
        self.write_nibble((value >> 4) & 0x0F);
        self.write_nibble(value & 0x0F);
        // Clear / home need the long settle time.
        if value == 0x01 || value == 0x02 {
            hw_init::delay_us(2_000);
        } else {
            hw_init::delay_us(50);
        }
    }

    #[cfg(target_os = "espidf")]
    fn command(&mut self, cmd: u8) {
        self.send(cmd, false);
    }

    #[cfg(target_os = "espidf")]
    fn set_cursor(&mut self, row: u8, col: u8) {
        const ROW_ADDR: [u8; 2] = [0x00, 0x40];
        self.command(0x80 | (ROW_ADDR[row as usize] + col));
    }

    #[cfg(target_os = "espidf")]
    fn write_line(&mut self, row: u8, text: &str) {
        self.set_cursor(row, 0);
        for byte in text.bytes().take(COLS) {
            self.send(byte, true);
        }
    }

    // ── Simulation implementation ────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn platform_init(&mut self) -> Result<(), DisplayError> {
        debug!("lcd(sim): init sequence skipped");
        Ok(())
    }
}

impl DisplayPort for Lcd {
    fn render(&mut self, state: &ThermostatState) -> Result<(), DisplayError> {
        if !self.initialised {
            return Err(DisplayError::NotReady);
        }

        let (top, bottom) = Self::format_lines(state);

        #[cfg(target_os = "espidf")]
        {
            self.command(0x01);
            self.write_line(0, &top);
            self.write_line(1, &bottom);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            debug!("lcd(sim): |{top}| |{bottom}|");
            self.last_lines = [top, bottom];
        }

        Ok(())
    }
}
