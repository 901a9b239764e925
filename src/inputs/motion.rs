//! Re-triggerable motion hold ("monostable") for the PIR sensor.
//!
//! Any edge on the motion pin restarts a countdown to the full hold time
//! and sets `in_motion` immediately.  The 1 ms tick counts the timer down;
//! the main loop's [`MotionDebounce::poll`] clears `in_motion` once the
//! countdown has reached zero.  Activity therefore extends the "on" window
//! and silence for `hold_ms` ends it.
//!
//! Restarting always *sets* the countdown, it never adds to it, so an edge
//! storm cannot overflow or wrap the timer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionDebounce {
    hold_ms: u32,
    remaining_ms: u32,
    in_motion: bool,
    /// Long-press lockout: edges are ignored and motion stays off.
    suppressed: bool,
}

impl MotionDebounce {
    pub const fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            remaining_ms: 0,
            in_motion: false,
            suppressed: false,
        }
    }

    /// Edge on the motion pin (ISR side).
    pub fn on_edge(&mut self) {
        if self.suppressed {
            return;
        }
        self.remaining_ms = self.hold_ms;
        self.in_motion = true;
    }

    /// Advance the hold timer by `elapsed_ms` (ISR side).
    pub fn count_down(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    /// Main-loop check: clear `in_motion` once the hold has expired.
    /// Returns the resulting motion flag.
    pub fn poll(&mut self) -> bool {
        if self.in_motion && self.remaining_ms == 0 {
            self.in_motion = false;
        }
        self.in_motion
    }

    /// Force motion off and ignore edges until released.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
        if suppressed {
            self.in_motion = false;
            self.remaining_ms = 0;
        }
    }

    pub fn in_motion(&self) -> bool {
        self.in_motion
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }
}
