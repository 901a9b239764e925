//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard the lighting state handlers read from and
//! write to: the clock reading for this pass, the effective motion flag,
//! the lights themselves and the configuration that times the fades.

use crate::config::LightingConfig;
use crate::lighting::Lights;

pub struct FsmContext {
    // -- Timing --
    /// Clock reading for the current loop pass (ms since boot, wrapping).
    pub now_ms: u32,
    /// Milliseconds since the current state was entered.
    pub ms_in_state: u32,

    // -- Inputs --
    /// Motion held and not locked out.
    pub in_motion: bool,

    // -- Outputs --
    pub lights: Lights,

    // -- Configuration --
    pub config: LightingConfig,
}

impl FsmContext {
    pub fn new(config: LightingConfig) -> Self {
        Self {
            now_ms: 0,
            ms_in_state: 0,
            in_motion: false,
            lights: Lights::from_config(&config),
            config,
        }
    }

    /// Fade-in window has elapsed.
    pub fn fade_in_done(&self) -> bool {
        self.ms_in_state >= self.config.fade_in_ms
    }

    /// Fade-out window has elapsed and every light has come to rest.
    pub fn fade_out_done(&self) -> bool {
        self.ms_in_state >= self.config.fade_out_ms && self.lights.all_settled()
    }
}
