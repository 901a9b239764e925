//! Linear fade controller bound to a set of driver channels.
//!
//! A new fade always starts from the level the zone shows *now*, so
//! reversing direction mid-fade never jumps.  Interpolation is integer
//! only; `duration_ms == 0` means an immediate jump.

use super::Frame;
use crate::config::ChannelList;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedZone {
    channels: ChannelList,
    max_level: u8,
    current: u8,
    source: u8,
    target: u8,
    started_ms: u32,
    duration_ms: u32,
}

impl LedZone {
    pub fn new(channels: ChannelList, max_level: u8) -> Self {
        Self {
            channels,
            max_level,
            current: 0,
            source: 0,
            target: 0,
            started_ms: 0,
            duration_ms: 0,
        }
    }

    /// Fade to full over `duration_ms`.
    pub fn on(&mut self, now_ms: u32, duration_ms: u32) {
        self.fade_to(now_ms, self.max_level, duration_ms);
    }

    /// Fade to dark over `duration_ms`.
    pub fn off(&mut self, now_ms: u32, duration_ms: u32) {
        self.fade_to(now_ms, 0, duration_ms);
    }

    pub fn fade_to(&mut self, now_ms: u32, level: u8, duration_ms: u32) {
        self.run(now_ms);
        let level = level.min(self.max_level);
        if self.current == level && self.source == level {
            // Already resting there; keep the old fade bookkeeping.
            return;
        }
        self.source = self.current;
        self.target = level;
        self.started_ms = now_ms;
        self.duration_ms = duration_ms;
        if duration_ms == 0 {
            self.current = self.target;
            self.source = self.target;
        }
    }

    /// Interpolate to `now_ms` and return the current level.
    pub fn run(&mut self, now_ms: u32) -> u8 {
        if self.current == self.target && self.source == self.target {
            return self.current;
        }
        let elapsed = now_ms.wrapping_sub(self.started_ms);
        if elapsed >= self.duration_ms {
            self.current = self.target;
            self.source = self.target;
        } else {
            let source = i64::from(self.source);
            let span = i64::from(self.target) - source;
            let level = source + span * i64::from(elapsed) / i64::from(self.duration_ms);
            self.current = level as u8;
        }
        self.current
    }

    /// Jump straight to `level`, cancelling any fade.
    pub fn set_level(&mut self, level: u8) {
        let level = level.min(self.max_level);
        self.current = level;
        self.source = level;
        self.target = level;
        self.duration_ms = 0;
    }

    pub fn level(&self) -> u8 {
        self.current
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    /// Write the current level into every owned channel.
    pub fn commit(&self, frame: &mut Frame) {
        for &channel in &self.channels {
            frame.set(channel, self.current);
        }
    }
}
