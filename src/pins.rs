//! GPIO / peripheral pin assignments for the MotionLight board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Momentary push-button, active-low with internal pull-up.
/// Interrupt on any edge; the classifier keeps only real level changes.
pub const BUTTON_GPIO: i32 = 4;

/// PIR motion sensor output, internal pull-up.
/// Interrupt on any edge; every edge re-arms the motion hold timer.
pub const MOTION_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// TLC5940 LED driver (SPI2 / FSPI)
// ---------------------------------------------------------------------------

/// Serial clock into the driver's SCLK.
pub const LED_SCLK_GPIO: i32 = 12;
/// Serial data into the driver's SIN.
pub const LED_MOSI_GPIO: i32 = 11;
/// Latch: a rising edge moves the shift register into the output registers.
pub const LED_XLAT_GPIO: i32 = 10;
/// HIGH while dot-correction data is shifted, LOW for grayscale.
pub const LED_VPRG_GPIO: i32 = 9;
/// LOW enables the outputs; a HIGH pulse restarts the grayscale counter.
pub const LED_BLANK_GPIO: i32 = 8;
/// Grayscale PWM reference clock (LEDC channel 0).
pub const LED_GSCLK_GPIO: i32 = 7;

/// SPI clock for the LED driver.  The TLC5940 accepts up to 30 MHz; 4 MHz
/// keeps the ribbon cable to the light bars well behaved.
pub const LED_SPI_BAUD_HZ: u32 = 4_000_000;
