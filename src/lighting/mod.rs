//! Lighting zones and frame composition.
//!
//! Each configured zone becomes a [`Light`]: an [`LedZone`] plus either a
//! steady fade or an animated [`Generator`].  Once per loop pass the
//! scheduler steps every light and composes the per-channel [`Frame`] that
//! the refresh path pushes to the driver.

pub mod waveform;
pub mod zone;

use heapless::Vec;

use crate::config::{CHANNEL_COUNT, EffectConfig, LightingConfig, MAX_ZONES, ZoneConfig, ZoneName};
use waveform::{Generator, Waveform};
use zone::LedZone;

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One level per driver channel, `0..=max_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; CHANNEL_COUNT]);

impl Frame {
    pub const fn new() -> Self {
        Self([0; CHANNEL_COUNT])
    }

    /// Out-of-range channels are ignored.
    pub fn set(&mut self, channel: u8, level: u8) {
        if let Some(slot) = self.0.get_mut(usize::from(channel)) {
            *slot = level;
        }
    }

    pub fn get(&self, channel: u8) -> u8 {
        self.0.get(usize::from(channel)).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.0 = [0; CHANNEL_COUNT];
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Light
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Follows the scheduler's fade in / fade out.
    Steady,
    /// Driven by a waveform while the lights are on.
    Animated(Generator),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Light {
    name: ZoneName,
    zone: LedZone,
    effect: Effect,
}

impl Light {
    pub fn from_config(config: &ZoneConfig, max_level: u8) -> Self {
        let waveform = match config.effect {
            EffectConfig::Steady => None,
            EffectConfig::Pulse { period_ms } => Some(Waveform::pulse(period_ms, max_level)),
            EffectConfig::Indicator {
                period_ms,
                duty,
                min,
                max,
            } => Some(Waveform::indicator(period_ms, duty, min, max)),
            EffectConfig::DoubleIndicator {
                period_ms,
                duty1,
                gap,
                duty2,
                min,
                max,
            } => Some(Waveform::double_indicator(
                period_ms, duty1, gap, duty2, min, max,
            )),
        };
        Self {
            name: config.name.clone(),
            zone: LedZone::new(config.channels.clone(), max_level),
            effect: waveform.map_or(Effect::Steady, |w| {
                Effect::Animated(Generator::new(w, config.stop))
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone(&self) -> &LedZone {
        &self.zone
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.effect, Effect::Animated(_))
    }

    pub fn fade_on(&mut self, now_ms: u32, duration_ms: u32) {
        if let Effect::Steady = self.effect {
            self.zone.on(now_ms, duration_ms);
        }
    }

    pub fn fade_off(&mut self, now_ms: u32, duration_ms: u32) {
        if let Effect::Steady = self.effect {
            self.zone.off(now_ms, duration_ms);
        }
    }

    pub fn start_effect(&mut self) {
        if let Effect::Animated(generator) = &mut self.effect {
            generator.start();
        }
    }

    pub fn stop_effect(&mut self) {
        if let Effect::Animated(generator) = &mut self.effect {
            generator.stop();
        }
    }

    /// Advance the fade or the waveform.
    pub fn step(&mut self, now_ms: u32, delta_ms: u32) {
        match &mut self.effect {
            Effect::Steady => {
                self.zone.run(now_ms);
            }
            Effect::Animated(generator) => {
                let level = generator.step(delta_ms);
                self.zone.set_level(level);
            }
        }
    }

    /// No fade or stop ramp in progress.
    pub fn is_settled(&self) -> bool {
        match &self.effect {
            Effect::Steady => self.zone.is_settled(),
            Effect::Animated(generator) => generator.is_settled(),
        }
    }

    pub fn level(&self) -> u8 {
        self.zone.level()
    }

    pub fn commit(&self, frame: &mut Frame) {
        self.zone.commit(frame);
    }
}

// ---------------------------------------------------------------------------
// Lights
// ---------------------------------------------------------------------------

/// Every configured light, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lights {
    lights: Vec<Light, MAX_ZONES>,
}

impl Lights {
    pub fn from_config(config: &LightingConfig) -> Self {
        let mut lights = Vec::new();
        for zone in &config.zones {
            if lights.push(Light::from_config(zone, config.max_level)).is_err() {
                break;
            }
        }
        Self { lights }
    }

    pub fn fade_ambient_on(&mut self, now_ms: u32, duration_ms: u32) {
        for light in &mut self.lights {
            light.fade_on(now_ms, duration_ms);
        }
    }

    pub fn fade_ambient_off(&mut self, now_ms: u32, duration_ms: u32) {
        for light in &mut self.lights {
            light.fade_off(now_ms, duration_ms);
        }
    }

    pub fn start_effects(&mut self) {
        for light in &mut self.lights {
            light.start_effect();
        }
    }

    pub fn stop_effects(&mut self) {
        for light in &mut self.lights {
            light.stop_effect();
        }
    }

    pub fn step(&mut self, now_ms: u32, delta_ms: u32) {
        for light in &mut self.lights {
            light.step(now_ms, delta_ms);
        }
    }

    /// Rebuild `frame` from the current light levels.
    pub fn compose(&self, frame: &mut Frame) {
        frame.clear();
        for light in &self.lights {
            light.commit(frame);
        }
    }

    pub fn all_settled(&self) -> bool {
        self.lights.iter().all(Light::is_settled)
    }

    /// Every light dark and settled.
    pub fn all_dark(&self) -> bool {
        self.all_settled() && self.lights.iter().all(|l| l.level() == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.name() == name)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
