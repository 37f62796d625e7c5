//! GPIO / peripheral pin assignments for the HearthStat main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Actuation outputs (relay board, active HIGH)
// ---------------------------------------------------------------------------

/// Digital output: heating contactor enable.
pub const HEAT_OUTPUT_GPIO: i32 = 26;
/// Digital output: cooling contactor enable.
pub const COOL_OUTPUT_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Temperature sensors — NTC thermistors on ADC1
// ---------------------------------------------------------------------------

/// Indoor NTC thermistor — 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 6 (GPIO 34 on ESP32).
pub const TEMP_IN_ADC_GPIO: i32 = 34;
/// Outdoor NTC thermistor, same divider topology.
/// ADC1 channel 7 (GPIO 35 on ESP32).
pub const TEMP_OUT_ADC_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// User buttons (active-low with internal pull-ups)
// ---------------------------------------------------------------------------

/// Setpoint up.
pub const BTN_UP_GPIO: i32 = 32;
/// Setpoint down.
pub const BTN_DOWN_GPIO: i32 = 33;
/// Operating-mode cycle.
pub const BTN_MODE_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// HD44780 character LCD (4-bit parallel)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 13;
pub const LCD_EN_GPIO: i32 = 14;
pub const LCD_D4_GPIO: i32 = 18;
pub const LCD_D5_GPIO: i32 = 19;
pub const LCD_D6_GPIO: i32 = 21;
pub const LCD_D7_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Heartbeat LED
// ---------------------------------------------------------------------------

/// On-board LED, toggled by the main heartbeat loop.
pub const HEARTBEAT_LED_GPIO: i32 = 2;
