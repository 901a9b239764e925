//! Outbound application events.
//!
//! The [`LightingService`](super::service::LightingService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use crate::error::TransportError;
use crate::fsm::StateId;
use crate::inputs::button::PressClass;

/// Structured events emitted by the lighting core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The scheduler moved between states.
    StateChanged { from: StateId, to: StateId },

    /// A press/release cycle was classified.
    Press(PressClass),

    /// Short press toggled the brightness mode.
    BrightnessChanged { half: bool },

    /// Long press toggled the motion lockout.
    LockoutChanged { locked: bool },

    /// The LED driver rejected a write.  The next refresh retransmits.
    TransportFault(TransportError),

    /// Entering low-power sleep.
    Sleeping,

    /// Returned from low-power sleep.
    Woke,
}
