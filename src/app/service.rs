//! Application service: the lighting scheduler core.
//!
//! [`LightingService`] owns the FSM, the lights and the brightness/lockout
//! mode.  It exposes three per-pass entry points for the main loop, and all
//! I/O flows through port traits injected at call sites.
//!
//! ```text
//!  InputPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                │     LightingService      │
//!  FrameSink ◀───│  FSM · Lights · Modes    │ ──▶ PowerPort
//!                └──────────────────────────┘
//! ```
//!
//! * [`tick`](LightingService::tick): poll inputs, apply button commands,
//!   step fades and generators, run the FSM, compose the frame.
//! * [`refresh`](LightingService::refresh): push dot correction (when
//!   changed) and the full frame to the driver.
//! * [`maybe_sleep`](LightingService::maybe_sleep): drop into light sleep
//!   when idle and settled.

use log::{debug, info, warn};

use crate::config::{CHANNEL_COUNT, LightingConfig};
use crate::error::{Result, TransportError};
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::lighting::{Frame, Lights};

use super::commands::LightCommand;
use super::events::AppEvent;
use super::ports::{EventSink, FrameSink, InputPort, PowerPort};

// ───────────────────────────────────────────────────────────────
// LightingService
// ───────────────────────────────────────────────────────────────

pub struct LightingService {
    fsm: Fsm,
    ctx: FsmContext,
    frame: Frame,
    half_brightness: bool,
    locked_out: bool,
    /// Dot correction must be (re)written on the next refresh.
    dot_dirty: bool,
    button_held: bool,
    last_ms: u32,
    tick_count: u64,
}

impl LightingService {
    /// Validate `config` and build the service.
    ///
    /// Does **not** start the FSM: call [`start`](Self::start) next.
    pub fn new(config: LightingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: FsmContext::new(config),
            frame: Frame::new(),
            half_brightness: false,
            locked_out: false,
            dot_dirty: true,
            button_held: false,
            last_ms: 0,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Idle`, program dot correction and blank the outputs.
    pub fn start(
        &mut self,
        now_ms: u32,
        sink: &mut impl FrameSink,
        events: &mut impl EventSink,
    ) {
        self.ctx.now_ms = now_ms;
        self.last_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        self.refresh(sink, events);
        events.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("LightingService started in {:?}", self.fsm.current_state());
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// One main-loop pass at clock reading `now_ms`.
    pub fn tick(&mut self, now_ms: u32, inputs: &impl InputPort, events: &mut impl EventSink) {
        self.tick_count += 1;
        let delta_ms = now_ms.wrapping_sub(self.last_ms);
        self.last_ms = now_ms;

        // 1. Inputs: motion expiry + completed press
        let snapshot = inputs.poll();
        self.button_held = snapshot.button_held;
        if let Some(press) = snapshot.press {
            debug!("press classified: {:?}", press);
            events.emit(&AppEvent::Press(press));
            if let Some(cmd) = LightCommand::from_press(press, &self.ctx.config) {
                self.handle_command(cmd, inputs, events);
            }
        }

        // 2. Fades and generators
        self.ctx.now_ms = now_ms;
        self.ctx.in_motion = snapshot.in_motion && !self.locked_out;
        self.ctx.lights.step(now_ms, delta_ms);

        // 3. Scheduler
        let prev_state = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            events.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        // 4. Frame
        self.ctx.lights.compose(&mut self.frame);
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: LightCommand,
        inputs: &impl InputPort,
        events: &mut impl EventSink,
    ) {
        match cmd {
            LightCommand::ToggleHalfBrightness => {
                self.half_brightness = !self.half_brightness;
                self.dot_dirty = true;
                events.emit(&AppEvent::BrightnessChanged {
                    half: self.half_brightness,
                });
            }
            LightCommand::ToggleLockout => {
                self.locked_out = !self.locked_out;
                inputs.set_motion_suppressed(self.locked_out);
                events.emit(&AppEvent::LockoutChanged {
                    locked: self.locked_out,
                });
            }
        }
    }

    // ── Refresh ───────────────────────────────────────────────

    /// Push pending dot correction and the current frame to the driver.
    ///
    /// Failures are reported and otherwise tolerated: the whole frame goes
    /// out again on the next refresh, and a failed dot-correction write
    /// stays pending until one succeeds.
    pub fn refresh(&mut self, sink: &mut impl FrameSink, events: &mut impl EventSink) {
        if self.dot_dirty {
            let value = self.ctx.config.dot_correction(self.half_brightness);
            for channel in 0..CHANNEL_COUNT as u8 {
                sink.set_dot_correction(channel, value);
            }
            match sink.write_dot_correction() {
                Ok(()) => {
                    self.dot_dirty = false;
                    debug!("dot correction set to {}", value);
                }
                Err(e) => Self::report_fault(e, events),
            }
        }

        if let Err(e) = sink.write_channels(&self.frame) {
            Self::report_fault(e, events);
        }
    }

    fn report_fault(e: TransportError, events: &mut impl EventSink) {
        warn!("LED transport fault: {}", e);
        events.emit(&AppEvent::TransportFault(e));
    }

    // ── Power ─────────────────────────────────────────────────

    /// Whether the controller may sleep right now.
    pub fn can_sleep(&self) -> bool {
        self.ctx.config.sleep_when_idle
            && self.fsm.current_state() == StateId::Idle
            && self.ctx.lights.all_settled()
            && !self.button_held
    }

    /// Sleep until the next input interrupt if idle and settled.
    /// Returns `true` if the controller slept.
    pub fn maybe_sleep(&mut self, power: &mut impl PowerPort, events: &mut impl EventSink) -> bool {
        if !self.can_sleep() {
            return false;
        }
        events.emit(&AppEvent::Sleeping);
        power.enter_low_power();
        events.emit(&AppEvent::Woke);
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Frame composed by the last [`tick`](Self::tick).
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn lights(&self) -> &Lights {
        &self.ctx.lights
    }

    pub fn config(&self) -> &LightingConfig {
        &self.ctx.config
    }

    pub fn is_half_brightness(&self) -> bool {
        self.half_brightness
    }

    pub fn is_locked_out(&self) -> bool {
        self.locked_out
    }

    /// Dot correction still waiting to be written.
    pub fn dot_correction_pending(&self) -> bool {
        self.dot_dirty
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
