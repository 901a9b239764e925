//! Periodic tick and grayscale-refresh timers on ESP-IDF's esp_timer API.
//!
//! * tick timer (`tick_period_ms`): advances [`CLOCK`](crate::clock::CLOCK)
//!   and counts every input timer down by one period.
//! * refresh timer (`refresh_period_us`): pulses BLANK to restart the
//!   driver's grayscale counter and flags a frame push for the main loop,
//!   which owns the SPI bus.
//!
//! Callbacks run in the esp_timer task (not ISR) and only touch atomics and
//! the critical-section guarded input state.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use super::hw_init::HwInitError;

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering};

/// Period the tick callback reports to the clock, set before the timer starts.
#[cfg(target_os = "espidf")]
static TICK_PERIOD_MS: AtomicU32 = AtomicU32::new(1);

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut REFRESH_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    crate::inputs::tick_isr_handler(TICK_PERIOD_MS.load(Ordering::Relaxed));
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn refresh_cb(_arg: *mut core::ffi::c_void) {
    super::hw_init::pulse_blank();
    crate::clock::CLOCK.on_refresh();
}

#[cfg(target_os = "espidf")]
unsafe fn start_periodic(
    handle: *mut esp_timer_handle_t,
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    name: &'static [u8],
    period_us: u64,
) -> Result<(), HwInitError> {
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: false,
    };
    // SAFETY: `handle` points at one of the static handles above, written
    // only here at boot before any callback fires.
    let ret = unsafe { esp_timer_create(&args, handle) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::TimerFailed(ret));
    }
    let ret = unsafe { esp_timer_start_periodic(*handle, period_us) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::TimerFailed(ret));
    }
    Ok(())
}

/// Start the tick and refresh timers.
#[cfg(target_os = "espidf")]
pub fn start_timers(tick_period_ms: u32, refresh_period_us: u64) -> Result<(), HwInitError> {
    TICK_PERIOD_MS.store(tick_period_ms, Ordering::Relaxed);
    // SAFETY: the static handles are written once here from the main task
    // before either callback can run.
    unsafe {
        start_periodic(
            &raw mut TICK_TIMER,
            tick_cb,
            b"tick\0",
            u64::from(tick_period_ms) * 1_000,
        )?;
        start_periodic(&raw mut REFRESH_TIMER, refresh_cb, b"refresh\0", refresh_period_us)?;
    }
    info!(
        "hw_timer: tick@{}ms + refresh@{}us started",
        tick_period_ms, refresh_period_us
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_tick_period_ms: u32, _refresh_period_us: u64) -> Result<(), HwInitError> {
    log::info!("hw_timer(sim): timers not started (clock driven by the caller)");
    Ok(())
}
