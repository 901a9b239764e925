//! Light-sleep power management.
//!
//! The controller sleeps only when the scheduler is idle and every light
//! has settled.  Wake-up comes from the button or motion pin: each pin is
//! armed to wake on the level *opposite* to the one it reads at sleep
//! entry, which is the next edge its ISR would have seen.  Because GPIO
//! wake-up is level triggered, the edge interrupts are masked while asleep
//! and any level change that happened is replayed into the input handlers
//! after wake.

use log::debug;

use crate::app::ports::PowerPort;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init::gpio_read;
#[cfg(target_os = "espidf")]
use crate::pins;

/// [`PowerPort`] over ESP-IDF light sleep.
#[derive(Debug, Default)]
pub struct PowerManager {
    sleeps: u32,
}

impl PowerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed sleep/wake cycles since boot.
    pub fn sleep_count(&self) -> u32 {
        self.sleeps
    }
}

impl PowerPort for PowerManager {
    fn enter_low_power(&mut self) {
        debug!("power: light sleep #{}", self.sleeps + 1);
        light_sleep();
        self.sleeps = self.sleeps.wrapping_add(1);
    }
}

#[cfg(target_os = "espidf")]
fn wake_level(level_high: bool) -> gpio_int_type_t {
    if level_high {
        gpio_int_type_t_GPIO_INTR_LOW_LEVEL
    } else {
        gpio_int_type_t_GPIO_INTR_HIGH_LEVEL
    }
}

#[cfg(target_os = "espidf")]
fn light_sleep() {
    let wake_pins = [pins::BUTTON_GPIO, pins::MOTION_GPIO];
    let mut before = [false; 2];

    // SAFETY: main-task only; the pins were configured by hw_init and the
    // GPIO driver calls below are the documented light-sleep sequence.
    unsafe {
        for (slot, &pin) in before.iter_mut().zip(&wake_pins) {
            *slot = gpio_read(pin);
            gpio_intr_disable(pin);
            gpio_wakeup_enable(pin, wake_level(*slot));
        }
        esp_sleep_enable_gpio_wakeup();
        let ret = esp_light_sleep_start();
        if ret != ESP_OK as i32 {
            log::warn!("power: light sleep rejected (rc={})", ret);
        }

        for (&was_high, &pin) in before.iter().zip(&wake_pins) {
            gpio_wakeup_disable(pin);
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_ANYEDGE);
            gpio_intr_enable(pin);

            let now_high = gpio_read(pin);
            if now_high != was_high {
                if pin == pins::BUTTON_GPIO {
                    crate::inputs::button_isr_handler(now_high);
                } else {
                    crate::inputs::motion_isr_handler();
                }
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
fn light_sleep() {
    // Host builds: return at once, the caller re-evaluates on its next pass.
    std::thread::yield_now();
}
