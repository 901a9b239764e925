//! Unified error types for the MotionLight firmware.
//!
//! The lighting core itself is total: timers clamp at zero, levels clamp
//! at `[0, max]`, and every transition is a function of flags and elapsed
//! ticks.  What remains fallible is the boot-time configuration check and
//! the LED transport, and both funnel into [`Error`].  All variants are
//! `Copy` so they can be handed to the event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The lighting configuration failed validation.
    Config(ConfigError),
    /// The LED driver transport rejected a write.
    Transport(TransportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Reasons a [`LightingConfig`](crate::config::LightingConfig) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A zone references a channel the driver does not have.
    ChannelOutOfRange { channel: u8 },
    /// Two zones claim the same channel.
    ChannelOverlap { channel: u8 },
    /// A zone has no channels.
    EmptyZone,
    /// A waveform period is zero.
    ZeroPeriod,
    /// Duty fractions are out of range, leave no dark rest, or have no gap.
    InvalidDuty,
    /// The short-press threshold is not below the long-press threshold.
    PressThresholds,
    /// A brightness or dot-correction value exceeds the 6-bit range.
    LevelOutOfRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelOutOfRange { channel } => write!(f, "channel {channel} out of range"),
            Self::ChannelOverlap { channel } => write!(f, "channel {channel} claimed twice"),
            Self::EmptyZone => write!(f, "zone without channels"),
            Self::ZeroPeriod => write!(f, "waveform period is zero"),
            Self::InvalidDuty => write!(f, "invalid duty fractions"),
            Self::PressThresholds => write!(f, "short press must be below long press"),
            Self::LevelOutOfRange => write!(f, "level exceeds 6-bit range"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// SPI shift-out failed.
    Spi,
    /// XLAT or VPRG line could not be driven.
    Pin,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi => write!(f, "SPI write failed"),
            Self::Pin => write!(f, "control pin write failed"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
