//! Monotonic millisecond clock and grayscale-refresh flag.
//!
//! Both are written from timer callbacks and read by the main loop, so
//! they are plain atomics: the counter is only ever advanced by one
//! writer, and the refresh flag is a single byte that the main loop
//! consumes with `swap`.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Process-wide clock, advanced by the tick timer.
pub static CLOCK: Clock = Clock::new();

pub struct Clock {
    millis: AtomicU32,
    refresh_due: AtomicBool,
}

impl Clock {
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
            refresh_due: AtomicBool::new(false),
        }
    }

    /// Advance by one tick of `period_ms`.  Call only from the tick
    /// timer callback.
    pub fn advance(&self, period_ms: u32) {
        self.millis.fetch_add(period_ms, Ordering::Release);
    }

    /// Milliseconds since boot.  Wraps after ~49.7 days; consumers use
    /// `wrapping_sub` for every elapsed-time computation.
    pub fn now_ms(&self) -> u32 {
        self.millis.load(Ordering::Acquire)
    }

    /// Mark a grayscale refresh as due.  Call from the refresh timer.
    pub fn on_refresh(&self) {
        self.refresh_due.store(true, Ordering::Release);
    }

    /// Consume a pending refresh.  Returns `true` at most once per
    /// `on_refresh()` burst.
    pub fn take_refresh(&self) -> bool {
        self.refresh_due.swap(false, Ordering::AcqRel)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
