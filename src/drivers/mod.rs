//! LED driver chip, hardware initialisation, and peripheral timers.

pub mod hw_init;
pub mod hw_timer;
pub mod tlc594x;
