//! Interrupt-shared input state.
//!
//! ```text
//!   motion edge ISR ─┐
//!   button edge ISR ─┼─▶ critical_section::Mutex ─▶ SharedInputs::poll() (main loop)
//!   1 ms tick cb ────┘
//! ```
//!
//! The debounce timers are written from three interrupt sources and read
//! by the main loop.  Every access, on either side, happens inside one
//! `critical_section::with`, so a timer restart can never interleave with
//! the expiry check that clears `in_motion`.  The ISR bodies are a handful
//! of integer stores; nothing here interpolates or allocates.

pub mod button;
pub mod motion;

use core::cell::RefCell;

use critical_section::Mutex;

use crate::app::ports::InputPort;
use crate::clock::CLOCK;
use crate::config::LightingConfig;
use button::{ButtonClassifier, PressClass};
use motion::MotionDebounce;

/// Process-wide input state.  Initialised once in `main`, never torn down.
pub static INPUTS: SharedInputs = SharedInputs::new();

/// What the main loop learns from one [`SharedInputs::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    /// Motion held (already false while locked out).
    pub in_motion: bool,
    /// Classification of a press completed since the last poll.
    pub press: Option<PressClass>,
    /// Button currently down.  Sleep is deferred while it is.
    pub button_held: bool,
}

struct Inner {
    motion: MotionDebounce,
    button: ButtonClassifier,
}

pub struct SharedInputs {
    inner: Mutex<RefCell<Option<Inner>>>,
}

impl SharedInputs {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Arm the debouncers with the configured thresholds.  Edges that
    /// arrive before this are dropped.
    pub fn init(&self, config: &LightingConfig) {
        critical_section::with(|cs| {
            self.inner.borrow_ref_mut(cs).replace(Inner {
                motion: MotionDebounce::new(config.motion_hold_ms),
                button: ButtonClassifier::new(
                    config.short_press_ms,
                    config.long_press_ms,
                    config.button_active_low,
                ),
            });
        });
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    // -- ISR side -----------------------------------------------------------

    pub fn on_motion_edge(&self) {
        self.with_inner(|i| i.motion.on_edge());
    }

    pub fn on_button_edge(&self, level_high: bool) {
        self.with_inner(|i| i.button.on_edge(level_high));
    }

    /// Record the button level read at boot without classifying it.
    pub fn seed_button_level(&self, level_high: bool) {
        self.with_inner(|i| i.button.seed_level(level_high));
    }

    /// Count every input timer down by `elapsed_ms`.
    pub fn on_tick(&self, elapsed_ms: u32) {
        self.with_inner(|i| {
            i.motion.count_down(elapsed_ms);
            i.button.count_down(elapsed_ms);
        });
    }

    // -- Main-loop side -----------------------------------------------------

    /// Expire motion if its hold ran out and drain the pending press.
    pub fn poll(&self) -> InputSnapshot {
        self.with_inner(|i| InputSnapshot {
            in_motion: i.motion.poll(),
            press: i.button.take_event(),
            button_held: i.button.is_pressed(),
        })
        .unwrap_or_default()
    }

    pub fn set_motion_suppressed(&self, suppressed: bool) {
        self.with_inner(|i| i.motion.set_suppressed(suppressed));
    }
}

impl Default for SharedInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for SharedInputs {
    fn poll(&self) -> InputSnapshot {
        SharedInputs::poll(self)
    }

    fn set_motion_suppressed(&self, suppressed: bool) {
        SharedInputs::set_motion_suppressed(self, suppressed);
    }
}

// ---------------------------------------------------------------------------
// Interrupt entry points
// ---------------------------------------------------------------------------

/// Motion pin, any edge.
pub fn motion_isr_handler() {
    INPUTS.on_motion_edge();
}

/// Button pin, any edge.  `level_high` is the level sampled in the ISR.
pub fn button_isr_handler(level_high: bool) {
    INPUTS.on_button_edge(level_high);
}

/// Tick timer, fired every `period_ms`: advance the clock and every input
/// countdown by the same amount.
pub fn tick_isr_handler(period_ms: u32) {
    CLOCK.advance(period_ms);
    INPUTS.on_tick(period_ms);
}
