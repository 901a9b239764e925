//! Periodic waveform generators for animated zones.
//!
//! ## Waveforms
//!
//! Every waveform is a pure function of the phase within one period.  The
//! dark part of each period comes first, so a freshly started indicator is
//! off at phase 0 and phase boundaries belong to the following segment.
//!
//! | Waveform          | Shape over one period                              |
//! |-------------------|----------------------------------------------------|
//! | Pulse             | triangle 0 → max at period/2 → 0                   |
//! | Indicator         | min for `period - on`, then max for `on`           |
//! | DoubleIndicator   | min for the rest, flash, gap, flash ending at period |
//!
//! ## Generator lifecycle
//!
//! ```text
//!   Idle ──start()──▶ Running ──stop()──▶ Stopping ──(ramp done)──▶ Idle
//!                        │                                           ▲
//!                        └──────stop() with Cut/Hold─────────────────┘
//! ```
//!
//! The generator is stepped on every loop pass whether running or not, so a
//! graceful stop finishes without extra scheduling.

use serde::{Deserialize, Serialize};

/// What a generator does with its output when stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopMode {
    /// Ramp down from the current level at the waveform's own slope.
    Fade,
    /// Drop to zero at once.
    Cut,
    /// Freeze at the last emitted level.
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Pulse {
        period_ms: u32,
        max: u8,
    },
    Indicator {
        period_ms: u32,
        on_ms: u32,
        min: u8,
        max: u8,
    },
    DoubleIndicator {
        period_ms: u32,
        rest_ms: u32,
        on1_ms: u32,
        gap_ms: u32,
        min: u8,
        max: u8,
    },
}

/// `fraction × period`, rounded to whole milliseconds and kept in range.
fn portion(period_ms: u32, fraction: f32) -> u32 {
    let ms = (fraction.clamp(0.0, 1.0) * period_ms as f32).round() as u32;
    ms.min(period_ms)
}

impl Waveform {
    pub fn pulse(period_ms: u32, max: u8) -> Self {
        Self::Pulse {
            period_ms: period_ms.max(1),
            max,
        }
    }

    pub fn indicator(period_ms: u32, duty: f32, min: u8, max: u8) -> Self {
        let period_ms = period_ms.max(1);
        Self::Indicator {
            period_ms,
            on_ms: portion(period_ms, duty),
            min,
            max,
        }
    }

    pub fn double_indicator(
        period_ms: u32,
        duty1: f32,
        gap: f32,
        duty2: f32,
        min: u8,
        max: u8,
    ) -> Self {
        let period_ms = period_ms.max(1);
        // At least one dark millisecond opens every period.
        let budget = period_ms - 1;
        let on1_ms = portion(period_ms, duty1).min(budget);
        let mut gap_ms = portion(period_ms, gap);
        if gap > 0.0 {
            // Keep the two flashes apart even when the gap rounds to zero.
            gap_ms = gap_ms.max(1);
        }
        let gap_ms = gap_ms.min(budget - on1_ms);
        let on2_ms = portion(period_ms, duty2).min(budget - on1_ms - gap_ms);
        Self::DoubleIndicator {
            period_ms,
            rest_ms: period_ms - on1_ms - gap_ms - on2_ms,
            on1_ms,
            gap_ms,
            min,
            max,
        }
    }

    pub fn period_ms(&self) -> u32 {
        match *self {
            Self::Pulse { period_ms, .. }
            | Self::Indicator { period_ms, .. }
            | Self::DoubleIndicator { period_ms, .. } => period_ms,
        }
    }

    /// Level at `phase_ms` into the period.  Phases past the period wrap.
    pub fn sample(&self, phase_ms: u32) -> u8 {
        let phase = phase_ms % self.period_ms();
        match *self {
            Self::Pulse { period_ms, max } => {
                let half = period_ms / 2;
                if half == 0 {
                    return 0;
                }
                let max = u32::from(max);
                let level = if phase < half {
                    max * phase / half
                } else {
                    max * (period_ms - phase) / (period_ms - half)
                };
                level as u8
            }
            Self::Indicator {
                period_ms,
                on_ms,
                min,
                max,
            } => {
                if phase >= period_ms - on_ms {
                    max
                } else {
                    min
                }
            }
            Self::DoubleIndicator {
                rest_ms,
                on1_ms,
                gap_ms,
                min,
                max,
                ..
            } => {
                let flash1 = rest_ms..rest_ms + on1_ms;
                let flash2_start = rest_ms + on1_ms + gap_ms;
                if flash1.contains(&phase) || phase >= flash2_start {
                    max
                } else {
                    min
                }
            }
        }
    }

    /// Time a `Fade` stop takes to ramp down from `from`.
    pub fn release_ms(&self, from: u8) -> u32 {
        match *self {
            Self::Pulse { period_ms, max } if max > 0 => {
                (period_ms / 2) * u32::from(from.min(max)) / u32::from(max)
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenState {
    Idle,
    Running,
    Stopping {
        from: u8,
        elapsed_ms: u32,
        duration_ms: u32,
    },
}

/// A waveform plus its run state and phase accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generator {
    waveform: Waveform,
    stop_mode: StopMode,
    state: GenState,
    phase_ms: u32,
    level: u8,
}

impl Generator {
    pub fn new(waveform: Waveform, stop_mode: StopMode) -> Self {
        Self {
            waveform,
            stop_mode,
            state: GenState::Idle,
            phase_ms: 0,
            level: 0,
        }
    }

    /// (Re)start from phase 0.
    pub fn start(&mut self) {
        self.state = GenState::Running;
        self.phase_ms = 0;
        self.level = self.waveform.sample(0);
    }

    /// Stop according to the configured [`StopMode`].  No-op unless running.
    pub fn stop(&mut self) {
        if self.state != GenState::Running {
            return;
        }
        match self.stop_mode {
            StopMode::Cut => {
                self.level = 0;
                self.state = GenState::Idle;
            }
            StopMode::Hold => self.state = GenState::Idle,
            StopMode::Fade => {
                let duration_ms = self.waveform.release_ms(self.level);
                if duration_ms == 0 {
                    self.level = 0;
                    self.state = GenState::Idle;
                } else {
                    self.state = GenState::Stopping {
                        from: self.level,
                        elapsed_ms: 0,
                        duration_ms,
                    };
                }
            }
        }
    }

    /// Advance by `delta_ms` and return the level to display.
    pub fn step(&mut self, delta_ms: u32) -> u8 {
        match &mut self.state {
            GenState::Idle => {}
            GenState::Running => {
                self.phase_ms = (self.phase_ms + delta_ms % self.waveform.period_ms())
                    % self.waveform.period_ms();
                self.level = self.waveform.sample(self.phase_ms);
            }
            GenState::Stopping {
                from,
                elapsed_ms,
                duration_ms,
            } => {
                *elapsed_ms = elapsed_ms.saturating_add(delta_ms);
                if *elapsed_ms >= *duration_ms {
                    self.level = 0;
                    self.state = GenState::Idle;
                } else {
                    let from32 = u32::from(*from);
                    self.level = (from32 - from32 * *elapsed_ms / *duration_ms) as u8;
                }
            }
        }
        self.level
    }

    pub fn is_running(&self) -> bool {
        self.state == GenState::Running
    }

    /// Idle with no ramp in progress.
    pub fn is_settled(&self) -> bool {
        self.state == GenState::Idle
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }
}
