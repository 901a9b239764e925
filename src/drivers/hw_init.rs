//! One-shot GPIO initialization and interrupt wiring.
//!
//! Configures the button and motion inputs (pull-up, any-edge interrupt),
//! the LED driver's BLANK line and its LEDC-generated GSCLK, and registers
//! the edge ISRs using raw ESP-IDF sys calls.  Called once from `main()` before the
//! loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::inputs::{INPUTS, button_isr_handler, motion_isr_handler};
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrAddFailed(i32),
    TimerFailed(i32),
    GsclkFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAddFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
            Self::TimerFailed(rc) => write!(f, "esp_timer setup failed (rc={})", rc),
            Self::GsclkFailed(rc) => write!(f, "LEDC grayscale clock setup failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

// ── Pin configuration ─────────────────────────────────────────

/// `gsclk_hz`: grayscale clock, see
/// [`gsclk_hz`](crate::drivers::tlc594x::gsclk_hz).
#[cfg(target_os = "espidf")]
pub fn init_peripherals(gsclk_hz: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_blank_output()?;
        init_gsclk(gsclk_hz)?;
    }
    info!("hw_init: GPIO configured, GSCLK @ {} Hz", gsclk_hz);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_gsclk_hz: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    for pin in [pins::BUTTON_GPIO, pins::MOTION_GPIO] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    info!("hw_init: button + motion inputs configured (pull-up, any edge)");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_blank_output() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LED_BLANK_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    // LOW enables the driver outputs.
    unsafe { gpio_set_level(pins::LED_BLANK_GPIO, 0) };
    Ok(())
}

// ── LEDC grayscale clock ──────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gsclk(gsclk_hz: u32) -> Result<(), HwInitError> {
    // 1-bit resolution, duty 1 of 2: a plain 50 % square wave.
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_1_BIT,
        freq_hz: gsclk_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GsclkFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::LED_GSCLK_GPIO,
            duty: 1,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GsclkFailed(ret));
    }
    Ok(())
}

/// Restart the driver's grayscale counter.  Called from the refresh timer,
/// once per grayscale cycle.
#[cfg(target_os = "espidf")]
pub fn pulse_blank() {
    // SAFETY: plain output register writes on a pin configured above.
    unsafe {
        gpio_set_level(pins::LED_BLANK_GPIO, 1);
        gpio_set_level(pins::LED_BLANK_GPIO, 0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn pulse_blank() {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe from task and ISR context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    // Pull-ups: an idle input reads HIGH.
    true
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn motion_gpio_isr(_arg: *mut core::ffi::c_void) {
    motion_isr_handler();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    button_isr_handler(gpio_read(pins::BUTTON_GPIO));
}

/// Install the per-pin GPIO ISR service and register the edge handlers.
/// Call after `init_peripherals()` and `INPUTS.init()`.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The handlers registered below only
    // touch the critical-section guarded input state.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let handlers: [(i32, unsafe extern "C" fn(*mut core::ffi::c_void)); 2] = [
            (pins::MOTION_GPIO, motion_gpio_isr),
            (pins::BUTTON_GPIO, button_gpio_isr),
        ];
        for (pin, handler) in handlers {
            let ret = gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut());
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrAddFailed(ret));
            }
            gpio_intr_enable(pin);
        }

        // Adopt the boot level so a button held through reset is not
        // mistaken for a fresh press.
        INPUTS.seed_button_level(gpio_read(pins::BUTTON_GPIO));

        info!("hw_init: ISR service installed (motion, button)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
