//! MotionLight firmware library.
//!
//! Exposes the lighting core for integration testing and for the firmware
//! binary.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, with host
//! simulation stubs alongside.

#![deny(unused_must_use)]

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod fsm;
pub mod inputs;
pub mod lighting;
pub mod pins;
pub mod power;

// Hardware-facing modules; ESP-IDF code inside is cfg-gated.
pub mod adapters;
pub mod drivers;
