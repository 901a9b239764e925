//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightingService (domain)
//! ```
//!
//! Driven adapters (LED driver, ISR-shared inputs, power management, event
//! sinks) implement these traits.  The
//! [`LightingService`](super::service::LightingService) consumes them via
//! generics, so the lighting core never touches hardware directly.

use crate::error::TransportError;
use crate::inputs::InputSnapshot;
use crate::lighting::Frame;

// ───────────────────────────────────────────────────────────────
// Frame sink (driven adapter: domain → LED driver)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the LED driver chip.
pub trait FrameSink {
    /// Push a complete brightness frame (levels `0..=max_level`).
    fn write_channels(&mut self, frame: &Frame) -> Result<(), TransportError>;

    /// Stage a dot-correction value for one channel.  Takes effect on
    /// the next [`write_dot_correction`](Self::write_dot_correction).
    fn set_dot_correction(&mut self, channel: u8, value: u8);

    /// Shift the staged dot-correction values into the chip.
    fn write_dot_correction(&mut self) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: ISR state → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port over the interrupt-shared debounce state.
pub trait InputPort {
    /// Run the motion expiry check and drain any completed press.
    fn poll(&self) -> InputSnapshot;

    /// Engage or release the motion lockout.
    fn set_motion_suppressed(&self, suppressed: bool);
}

// ───────────────────────────────────────────────────────────────
// Power port (driven adapter: domain → sleep controller)
// ───────────────────────────────────────────────────────────────

pub trait PowerPort {
    /// Block in a low-power state until the next input interrupt.
    fn enter_low_power(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
