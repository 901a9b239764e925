//! Concrete state handler functions and table builder.
//!
//! Each state is three plain `fn` pointers over the shared
//! [`FsmContext`]; no closures, no dynamic dispatch, no heap.
//!
//! ```text
//!  IDLE ──[motion]──▶ FADING_IN ──[fade_in_ms]──▶ STEADY_ON
//!    ▲                  ▲    │                        │
//!    │          [motion]│    └──────[no motion]───────┤
//!    │                  │                             ▼
//!    └──[fade_out_ms, settled]──────────────────── FADING_OUT
//! ```
//!
//! Animated effects start either with the fade-in or, when
//! `defer_effects_until_steady` is set, on reaching steady-on so that
//! flashes never overlap the ramp.  They always stop as the fade-out
//! begins.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: FadingIn
        StateDescriptor {
            id: StateId::FadingIn,
            name: "FadingIn",
            on_enter: Some(fading_in_enter),
            on_exit: None,
            on_update: fading_in_update,
        },
        // Index 2: SteadyOn
        StateDescriptor {
            id: StateId::SteadyOn,
            name: "SteadyOn",
            on_enter: Some(steady_on_enter),
            on_exit: None,
            on_update: steady_on_update,
        },
        // Index 3: FadingOut
        StateDescriptor {
            id: StateId::FadingOut,
            name: "FadingOut",
            on_enter: Some(fading_out_enter),
            on_exit: None,
            on_update: fading_out_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: everything dark, waiting for motion
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(_ctx: &mut FsmContext) {
    info!("IDLE: lights dark, waiting for motion");
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    ctx.in_motion.then_some(StateId::FadingIn)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FADING_IN: ambient zones ramping up
// ═══════════════════════════════════════════════════════════════════════════

fn fading_in_enter(ctx: &mut FsmContext) {
    ctx.lights.fade_ambient_on(ctx.now_ms, ctx.config.fade_in_ms);
    if !ctx.config.defer_effects_until_steady {
        ctx.lights.start_effects();
    }
    info!("FADING_IN: ramping up over {} ms", ctx.config.fade_in_ms);
}

fn fading_in_update(ctx: &mut FsmContext) -> Option<StateId> {
    if !ctx.in_motion {
        return Some(StateId::FadingOut);
    }
    if ctx.fade_in_done() {
        return Some(StateId::SteadyOn);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STEADY_ON: full brightness, effects animating
// ═══════════════════════════════════════════════════════════════════════════

fn steady_on_enter(ctx: &mut FsmContext) {
    if ctx.config.defer_effects_until_steady {
        ctx.lights.start_effects();
        debug!("STEADY_ON: effects started");
    }
}

fn steady_on_update(ctx: &mut FsmContext) -> Option<StateId> {
    (!ctx.in_motion).then_some(StateId::FadingOut)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FADING_OUT: ambient zones ramping down, effects released
// ═══════════════════════════════════════════════════════════════════════════

fn fading_out_enter(ctx: &mut FsmContext) {
    ctx.lights.fade_ambient_off(ctx.now_ms, ctx.config.fade_out_ms);
    ctx.lights.stop_effects();
    info!("FADING_OUT: ramping down over {} ms", ctx.config.fade_out_ms);
}

fn fading_out_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.in_motion {
        info!("FADING_OUT: motion resumed, cancelling");
        return Some(StateId::FadingIn);
    }
    ctx.fade_out_done().then_some(StateId::Idle)
}
