//! MotionLight Firmware: Main Entry Point
//!
//! Single-threaded superloop over a hexagonal core.  Interrupts only touch
//! the clock atomics and the critical-section guarded input state; all
//! fading, animation and SPI traffic happens here in the main task.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Tlc5940Sink      LogEventSink    SharedInputs   PowerManager  │
//! │  (FrameSink)      (EventSink)     (InputPort)    (PowerPort)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           LightingService (pure logic)                 │    │
//! │  │  FSM · Lights · Brightness · Lockout                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ISRs: motion edge · button edge · tick · refresh/BLANK tick    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::config::{Config as SpiConfig, DriverConfig};
use esp_idf_svc::hal::spi::SpiDeviceDriver;
use esp_idf_svc::hal::units::Hertz;

use motionlight::adapters::hardware::Tlc5940Sink;
use motionlight::adapters::log_sink::LogEventSink;
use motionlight::app::service::LightingService;
use motionlight::clock::CLOCK;
use motionlight::config::LightingConfig;
use motionlight::drivers::tlc594x::{Tlc594x, gsclk_hz};
use motionlight::drivers::{hw_init, hw_timer};
use motionlight::inputs::INPUTS;
use motionlight::pins as board;
use motionlight::power::PowerManager;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  MotionLight v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = LightingConfig::default();
    let mut service = LightingService::new(config)?;
    let config = service.config().clone();
    info!(
        "Config: {} zones, hold={}ms, fade={}/{}ms, press={}/{}ms",
        config.zones.len(),
        config.motion_hold_ms,
        config.fade_in_ms,
        config.fade_out_ms,
        config.short_press_ms,
        config.long_press_ms
    );

    // ── 3. Inputs + interrupts ────────────────────────────────
    INPUTS.init(&config);
    hw_init::init_peripherals(gsclk_hz(config.refresh_period_us))?;
    hw_init::init_isr_service()?;

    // ── 4. LED driver ─────────────────────────────────────────
    // GPIO fields below must match the numbers in `pins.rs`.
    let peripherals = Peripherals::take()?;
    let gpio = peripherals.pins;
    let spi = SpiDeviceDriver::new_single(
        peripherals.spi2,
        gpio.gpio12, // board::LED_SCLK_GPIO
        gpio.gpio11, // board::LED_MOSI_GPIO
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &DriverConfig::new(),
        &SpiConfig::new().baudrate(Hertz(board::LED_SPI_BAUD_HZ)),
    )?;
    let xlat = PinDriver::output(gpio.gpio10)?; // board::LED_XLAT_GPIO
    let vprg = PinDriver::output(gpio.gpio9)?; // board::LED_VPRG_GPIO
    let mut sink = Tlc5940Sink::new(Tlc594x::new(spi, xlat, vprg), config.max_level);

    let mut events = LogEventSink::new();
    let mut power = PowerManager::new();

    // ── 5. Timers + start ─────────────────────────────────────
    hw_timer::start_timers(config.tick_period_ms, config.refresh_period_us)?;
    service.start(CLOCK.now_ms(), &mut sink, &mut events);

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        service.tick(CLOCK.now_ms(), &INPUTS, &mut events);

        if CLOCK.take_refresh() {
            service.refresh(&mut sink, &mut events);
        }

        if service.can_sleep() {
            // Latch the dark frame before the clocks stop.
            service.refresh(&mut sink, &mut events);
            service.maybe_sleep(&mut power, &mut events);
        }

        FreeRtos::delay_ms(1);
    }
}
