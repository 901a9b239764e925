//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements  | Connects to                       |
//! |-------------|-------------|-----------------------------------|
//! | `hardware`  | FrameSink   | TLC594x over embedded-hal SPI     |
//! | `log_sink`  | EventSink   | Serial log output                 |
//!
//! `InputPort` is implemented by [`SharedInputs`](crate::inputs::SharedInputs)
//! and `PowerPort` by [`PowerManager`](crate::power::PowerManager).

pub mod hardware;
pub mod log_sink;
