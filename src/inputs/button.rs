//! Edge-driven button debounce and short/long press classification.
//!
//! ## Hardware
//!
//! Momentary switch, active-low with pull-up by default.  The GPIO fires
//! on any edge and the ISR hands the sampled level to
//! [`ButtonClassifier::on_edge`].  Contact bounce produces interrupt
//! bursts; only a change against the previously observed level counts, so
//! a burst re-arms the classifier at most once.
//!
//! ## Classification
//!
//! Two countdowns are armed at press start and run down on the 1 ms tick.
//! The class is decided at release:
//!
//! | Held for                       | Class     | Action               |
//! |--------------------------------|-----------|----------------------|
//! | `< short_ms`                   | `NoPress` | none (bounce/noise)  |
//! | `short_ms ..< long_ms`         | `Short`   | toggle half brightness |
//! | `>= long_ms`                   | `Long`    | toggle motion lockout |

/// Result of a completed press/release cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressClass {
    NoPress,
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressed {
        short_remaining_ms: u32,
        long_remaining_ms: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonClassifier {
    short_ms: u32,
    long_ms: u32,
    active_low: bool,
    last_level_high: bool,
    state: PressState,
    pending: Option<PressClass>,
}

impl ButtonClassifier {
    /// `active_low`: the pin reads LOW while the button is held.
    pub const fn new(short_ms: u32, long_ms: u32, active_low: bool) -> Self {
        Self {
            short_ms,
            long_ms,
            active_low,
            // Released level: HIGH for a pulled-up, active-low button.
            last_level_high: active_low,
            state: PressState::Idle,
            pending: None,
        }
    }

    /// Pin level sampled by the edge ISR.
    pub fn on_edge(&mut self, level_high: bool) {
        if level_high == self.last_level_high {
            return;
        }
        self.last_level_high = level_high;
        let pressed = level_high != self.active_low;

        match (self.state, pressed) {
            (PressState::Idle, true) => {
                self.state = PressState::Pressed {
                    short_remaining_ms: self.short_ms,
                    long_remaining_ms: self.long_ms,
                };
            }
            (
                PressState::Pressed {
                    short_remaining_ms,
                    long_remaining_ms,
                },
                false,
            ) => {
                let class = if long_remaining_ms == 0 {
                    PressClass::Long
                } else if short_remaining_ms == 0 {
                    PressClass::Short
                } else {
                    PressClass::NoPress
                };
                self.pending = Some(class);
                self.state = PressState::Idle;
            }
            _ => {}
        }
    }

    /// Adopt `level_high` as the last observed level without arming or
    /// completing a press.  Used at boot, when the level read from the pin
    /// says nothing about when a press started.
    pub fn seed_level(&mut self, level_high: bool) {
        if self.state == PressState::Idle {
            self.last_level_high = level_high;
        }
    }

    /// Run the press timers down by `elapsed_ms` (tick ISR side).
    pub fn count_down(&mut self, elapsed_ms: u32) {
        if let PressState::Pressed {
            short_remaining_ms,
            long_remaining_ms,
        } = &mut self.state
        {
            *short_remaining_ms = short_remaining_ms.saturating_sub(elapsed_ms);
            *long_remaining_ms = long_remaining_ms.saturating_sub(elapsed_ms);
        }
    }

    /// Take the classification of the last completed press, if any.
    pub fn take_event(&mut self) -> Option<PressClass> {
        self.pending.take()
    }

    /// True between a press edge and its release edge.
    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }
}
