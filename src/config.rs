//! Lighting configuration
//!
//! Every tunable of the controller lives here: input timing, fade
//! durations, brightness limits and the channel partition into zones.
//! [`LightingConfig::default`] is the reference fitting (light bars plus
//! beacon and strobe); [`LightingConfig::validate`] runs once at boot.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lighting::waveform::StopMode;

/// Outputs on the LED driver.
pub const CHANNEL_COUNT: usize = 32;
/// Upper bound on configured zones.
pub const MAX_ZONES: usize = 8;
/// Largest level the 6-bit brightness and dot-correction registers hold.
pub const MAX_LEVEL: u8 = 63;

pub type ZoneName = String<16>;
pub type ChannelList = Vec<u8, CHANNEL_COUNT>;

/// What drives a zone's level while the lights are on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectConfig {
    /// Fades to full with the scheduler, holds there.
    Steady,
    /// Triangle "breathing" between 0 and the zone maximum.
    Pulse { period_ms: u32 },
    /// Single blink per period, lit for `duty × period`.
    Indicator {
        period_ms: u32,
        duty: f32,
        min: u8,
        max: u8,
    },
    /// Two flashes per period separated by `gap × period`.
    DoubleIndicator {
        period_ms: u32,
        duty1: f32,
        gap: f32,
        duty2: f32,
        min: u8,
        max: u8,
    },
}

impl EffectConfig {
    /// Stop behaviour used when a zone does not override it.
    pub fn default_stop(&self) -> StopMode {
        match self {
            Self::Pulse { .. } => StopMode::Fade,
            _ => StopMode::Cut,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: ZoneName,
    /// Driver outputs owned by this zone.  Zones partition the channels.
    pub channels: ChannelList,
    pub effect: EffectConfig,
    /// Only meaningful for animated effects.
    pub stop: StopMode,
}

impl ZoneConfig {
    pub fn new(name: &str, channels: core::ops::Range<u8>, effect: EffectConfig) -> Self {
        Self {
            name: label(name),
            channels: channel_list(channels),
            stop: effect.default_stop(),
            effect,
        }
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    // --- Brightness ---
    /// Full-scale zone level (6-bit driver depth).
    pub max_level: u8,
    /// Dot correction in full-brightness mode.
    pub full_dot_correction: u8,
    /// Dot correction in half-brightness mode.
    pub half_dot_correction: u8,

    // --- Inputs ---
    /// Motion hold after the last PIR edge (ms).
    pub motion_hold_ms: u32,
    /// Presses shorter than this are bounce (ms).
    pub short_press_ms: u32,
    /// Presses at least this long are long presses (ms).
    pub long_press_ms: u32,
    /// A long press toggles the motion lockout.
    pub long_press_locks_out: bool,
    /// Button pin reads LOW while pressed (pull-up wiring).
    pub button_active_low: bool,

    // --- Scheduler ---
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
    /// Start animated effects on reaching steady-on rather than at motion
    /// start, so flashes never overlap the fade.
    pub defer_effects_until_steady: bool,
    /// Enter light sleep once idle and settled.
    pub sleep_when_idle: bool,

    // --- Timing ---
    /// Logical clock tick (ms).
    pub tick_period_ms: u32,
    /// Grayscale refresh period (µs).
    pub refresh_period_us: u64,

    pub zones: Vec<ZoneConfig, MAX_ZONES>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        let mut zones = Vec::new();
        for zone in [
            ZoneConfig::new("white", 0..10, EffectConfig::Steady),
            ZoneConfig::new("red", 10..14, EffectConfig::Steady),
            ZoneConfig::new("red-pulsing", 14..16, EffectConfig::Pulse { period_ms: 800 }),
            ZoneConfig::new("position", 16..18, EffectConfig::Steady),
            ZoneConfig::new(
                "beacon",
                18..20,
                EffectConfig::Indicator {
                    period_ms: 1300,
                    duty: 0.2,
                    min: 0,
                    max: MAX_LEVEL,
                },
            ),
            ZoneConfig::new(
                "strobe",
                20..22,
                EffectConfig::DoubleIndicator {
                    period_ms: 1700,
                    duty1: 0.1,
                    gap: 0.2,
                    duty2: 0.1,
                    min: 0,
                    max: MAX_LEVEL,
                },
            ),
        ] {
            if zones.push(zone).is_err() {
                break;
            }
        }

        Self {
            max_level: MAX_LEVEL,
            full_dot_correction: 63,
            half_dot_correction: 31,

            motion_hold_ms: 10_000,
            short_press_ms: 50,
            long_press_ms: 1000,
            long_press_locks_out: true,
            button_active_low: true,

            fade_in_ms: 500,
            fade_out_ms: 500,
            defer_effects_until_steady: true,
            sleep_when_idle: true,

            tick_period_ms: 1,
            refresh_period_us: 4_000,

            zones,
        }
    }
}

impl LightingConfig {
    /// Dot correction for the given brightness mode.
    pub fn dot_correction(&self, half_brightness: bool) -> u8 {
        if half_brightness {
            self.half_dot_correction
        } else {
            self.full_dot_correction
        }
    }

    /// Reject configurations the controller cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_level > MAX_LEVEL
            || self.full_dot_correction > MAX_LEVEL
            || self.half_dot_correction > self.full_dot_correction
        {
            return Err(ConfigError::LevelOutOfRange);
        }
        if self.short_press_ms >= self.long_press_ms {
            return Err(ConfigError::PressThresholds);
        }
        if self.tick_period_ms == 0 || self.refresh_period_us == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        let mut claimed: u32 = 0;
        for zone in &self.zones {
            if zone.channels.is_empty() {
                return Err(ConfigError::EmptyZone);
            }
            for &channel in &zone.channels {
                if usize::from(channel) >= CHANNEL_COUNT {
                    return Err(ConfigError::ChannelOutOfRange { channel });
                }
                let bit = 1u32 << channel;
                if claimed & bit != 0 {
                    return Err(ConfigError::ChannelOverlap { channel });
                }
                claimed |= bit;
            }
            self.validate_effect(&zone.effect)?;
        }
        Ok(())
    }

    fn validate_effect(&self, effect: &EffectConfig) -> Result<(), ConfigError> {
        let in_unit = |x: f32| (0.0..=1.0).contains(&x);
        let (period_ms, duty_ok, min, max) = match *effect {
            EffectConfig::Steady => return Ok(()),
            EffectConfig::Pulse { period_ms } => (period_ms, true, 0, self.max_level),
            EffectConfig::Indicator {
                period_ms,
                duty,
                min,
                max,
            } => (period_ms, in_unit(duty), min, max),
            EffectConfig::DoubleIndicator {
                period_ms,
                duty1,
                gap,
                duty2,
                min,
                max,
            } => (
                period_ms,
                in_unit(duty1)
                    && in_unit(gap)
                    && in_unit(duty2)
                    && gap > 0.0
                    && duty1 + gap + duty2 < 1.0,
                min,
                max,
            ),
        };
        if period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if !duty_ok {
            return Err(ConfigError::InvalidDuty);
        }
        if min > max || max > self.max_level {
            return Err(ConfigError::LevelOutOfRange);
        }
        Ok(())
    }
}

fn label(name: &str) -> ZoneName {
    let mut out = ZoneName::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

fn channel_list(range: core::ops::Range<u8>) -> ChannelList {
    let mut out = ChannelList::new();
    for channel in range {
        if out.push(channel).is_err() {
            break;
        }
    }
    out
}
