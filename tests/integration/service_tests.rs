//! Integration tests for the inputs → LightingService → FrameSink pipeline.
//!
//! Time is simulated one millisecond at a time: every step counts the
//! input timers down (as the tick callback would) and then runs one
//! main-loop pass.

use crate::mock_hw::{MockFrameSink, MockPower, RecordingSink, advance};

use motionlight::app::events::AppEvent;
use motionlight::app::service::LightingService;
use motionlight::config::{EffectConfig, LightingConfig, ZoneConfig};
use motionlight::error::{ConfigError, Error, TransportError};
use motionlight::fsm::StateId;
use motionlight::inputs::SharedInputs;
use motionlight::inputs::button::PressClass;
use motionlight::lighting::Effect;

fn make_app_with(config: LightingConfig) -> (LightingService, SharedInputs, MockFrameSink, RecordingSink) {
    let inputs = SharedInputs::new();
    inputs.init(&config);
    let mut app = LightingService::new(config).expect("valid config");
    let mut sink = MockFrameSink::new();
    let mut events = RecordingSink::new();
    app.start(0, &mut sink, &mut events);
    (app, inputs, sink, events)
}

fn make_app() -> (LightingService, SharedInputs, MockFrameSink, RecordingSink) {
    make_app_with(LightingConfig::default())
}

fn press(
    app: &mut LightingService,
    inputs: &SharedInputs,
    events: &mut RecordingSink,
    now: &mut u32,
    held_ms: u32,
) {
    inputs.on_button_edge(false);
    advance(app, inputs, events, now, held_ms);
    inputs.on_button_edge(true);
    advance(app, inputs, events, now, 1);
}

fn transitions(events: &RecordingSink) -> Vec<(StateId, StateId)> {
    events
        .events
        .iter()
        .filter_map(|e| match *e {
            AppEvent::StateChanged { from, to } => Some((from, to)),
            _ => None,
        })
        .collect()
}

fn effect_running(app: &LightingService, name: &str) -> bool {
    app.lights()
        .get(name)
        .is_some_and(|l| matches!(l.effect(), Effect::Animated(g) if g.is_running()))
}

// ── Motion cycle ──────────────────────────────────────────────

#[test]
fn motion_cycle_fades_in_holds_and_returns_to_idle() {
    let (mut app, inputs, _sink, mut events) = make_app();
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 1);
    assert_eq!(app.state(), StateId::FadingIn);
    assert!(!effect_running(&app, "beacon"), "effects wait for steady-on");

    let mut last = app.frame().get(0);
    for _ in 0..499 {
        advance(&mut app, &inputs, &mut events, &mut now, 1);
        let level = app.frame().get(0);
        assert!(level >= last, "fade-in went backwards at {now}ms");
        last = level;
    }

    advance(&mut app, &inputs, &mut events, &mut now, 1);
    assert_eq!(now, 501);
    assert_eq!(app.state(), StateId::SteadyOn);
    assert_eq!(app.frame().get(0), 63);
    assert_eq!(app.frame().get(13), 63);
    assert!(effect_running(&app, "beacon"));
    assert!(effect_running(&app, "strobe"));

    // Hold expires 10 s after the only edge.
    let dt = 9_999 - now;
    advance(&mut app, &inputs, &mut events, &mut now, dt);
    assert_eq!(app.state(), StateId::SteadyOn);
    advance(&mut app, &inputs, &mut events, &mut now, 1);
    assert_eq!(app.state(), StateId::FadingOut);
    assert!(!effect_running(&app, "beacon"));

    advance(&mut app, &inputs, &mut events, &mut now, 600);
    assert_eq!(app.state(), StateId::Idle);
    assert!(app.frame().as_slice().iter().all(|&l| l == 0));

    assert_eq!(
        transitions(&events),
        vec![
            (StateId::Idle, StateId::FadingIn),
            (StateId::FadingIn, StateId::SteadyOn),
            (StateId::SteadyOn, StateId::FadingOut),
            (StateId::FadingOut, StateId::Idle),
        ]
    );
}

#[test]
fn repeated_motion_extends_the_hold() {
    let (mut app, inputs, _sink, mut events) = make_app();
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 5_000);
    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 5_000);
    assert_eq!(app.state(), StateId::SteadyOn, "second edge restarted the hold");

    advance(&mut app, &inputs, &mut events, &mut now, 4_999);
    assert_eq!(app.state(), StateId::SteadyOn);
    advance(&mut app, &inputs, &mut events, &mut now, 1);
    assert_eq!(app.state(), StateId::FadingOut);
}

#[test]
fn motion_during_fade_out_reverses_without_jump() {
    let (mut app, inputs, _sink, mut events) = make_app();
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 10_000);
    assert_eq!(app.state(), StateId::FadingOut);

    advance(&mut app, &inputs, &mut events, &mut now, 250);
    let before = app.frame().get(0);
    assert!(before > 0 && before < 63, "mid fade: {before}");

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 1);
    assert_eq!(app.state(), StateId::FadingIn);
    let after = app.frame().get(0);
    assert!(after.abs_diff(before) <= 1, "jumped from {before} to {after}");

    advance(&mut app, &inputs, &mut events, &mut now, 600);
    assert_eq!(app.state(), StateId::SteadyOn);
    assert_eq!(app.frame().get(0), 63);
}

#[test]
fn idle_and_settled_controller_sleeps() {
    let (mut app, inputs, _sink, mut events) = make_app();
    let mut power = MockPower::default();
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 100);
    assert!(!app.maybe_sleep(&mut power, &mut events), "lit");

    advance(&mut app, &inputs, &mut events, &mut now, 11_000);
    assert_eq!(app.state(), StateId::Idle);
    assert!(app.maybe_sleep(&mut power, &mut events));
    assert_eq!(power.sleeps, 1);
    assert!(events.contains(&AppEvent::Sleeping));
    assert!(events.contains(&AppEvent::Woke));
}

#[test]
fn sleep_can_be_disabled() {
    let config = LightingConfig {
        sleep_when_idle: false,
        ..LightingConfig::default()
    };
    let (mut app, inputs, _sink, mut events) = make_app_with(config);
    let mut power = MockPower::default();
    let mut now = 0;

    advance(&mut app, &inputs, &mut events, &mut now, 10);
    assert!(!app.can_sleep());
    assert!(!app.maybe_sleep(&mut power, &mut events));
    assert_eq!(power.sleeps, 0);
}

// ── Button ────────────────────────────────────────────────────

#[test]
fn short_press_toggles_half_brightness() {
    let (mut app, inputs, mut sink, mut events) = make_app();
    let mut now = 0;
    assert_eq!(sink.dot, vec![63; 32]);

    press(&mut app, &inputs, &mut events, &mut now, 200);
    assert!(events.contains(&AppEvent::Press(PressClass::Short)));
    assert!(app.is_half_brightness());

    app.refresh(&mut sink, &mut events);
    assert_eq!(sink.dot, vec![31; 32]);
    assert_eq!(sink.dot_writes, 2);

    press(&mut app, &inputs, &mut events, &mut now, 200);
    assert!(!app.is_half_brightness());
    app.refresh(&mut sink, &mut events);
    assert_eq!(sink.dot, vec![63; 32]);
    assert_eq!(sink.dot_writes, 3);
}

#[test]
fn bounce_length_press_does_nothing() {
    let (mut app, inputs, mut sink, mut events) = make_app();
    let mut now = 0;

    press(&mut app, &inputs, &mut events, &mut now, 20);
    assert!(events.contains(&AppEvent::Press(PressClass::NoPress)));
    assert!(!app.is_half_brightness());
    assert!(!app.is_locked_out());

    app.refresh(&mut sink, &mut events);
    assert_eq!(sink.dot_writes, 1, "no dot-correction rewrite");
}

#[test]
fn long_press_locks_out_motion_while_lit() {
    let (mut app, inputs, _sink, mut events) = make_app();
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 600);
    assert_eq!(app.state(), StateId::SteadyOn);

    press(&mut app, &inputs, &mut events, &mut now, 1_100);
    assert!(events.contains(&AppEvent::Press(PressClass::Long)));
    assert!(events.contains(&AppEvent::LockoutChanged { locked: true }));
    assert_eq!(app.state(), StateId::FadingOut);

    advance(&mut app, &inputs, &mut events, &mut now, 600);
    assert_eq!(app.state(), StateId::Idle);

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 50);
    assert_eq!(app.state(), StateId::Idle, "motion ignored while locked out");

    press(&mut app, &inputs, &mut events, &mut now, 1_100);
    assert!(!app.is_locked_out());
    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 1);
    assert_eq!(app.state(), StateId::FadingIn);
}

#[test]
fn long_press_ignored_when_lockout_disabled() {
    let config = LightingConfig {
        long_press_locks_out: false,
        ..LightingConfig::default()
    };
    let (mut app, inputs, _sink, mut events) = make_app_with(config);
    let mut now = 0;

    press(&mut app, &inputs, &mut events, &mut now, 1_500);
    assert!(events.contains(&AppEvent::Press(PressClass::Long)));
    assert!(!app.is_locked_out());
}

// ── Transport ─────────────────────────────────────────────────

#[test]
fn transport_faults_are_reported_and_recovered() {
    let (mut app, inputs, mut sink, mut events) = make_app();
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 600);

    sink.fail_frames = true;
    app.refresh(&mut sink, &mut events);
    app.refresh(&mut sink, &mut events);
    assert_eq!(
        events.count(|e| *e == AppEvent::TransportFault(TransportError::Spi)),
        2
    );

    sink.fail_frames = false;
    app.refresh(&mut sink, &mut events);
    assert_eq!(sink.last_frame().map(|f| f[0]), Some(63));
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn overlapping_zones_are_rejected() {
    let mut config = LightingConfig::default();
    config
        .zones
        .push(ZoneConfig::new("extra", 5..7, EffectConfig::Steady))
        .expect("zone capacity");
    assert!(matches!(
        LightingService::new(config),
        Err(Error::Config(ConfigError::ChannelOverlap { channel: 5 }))
    ));
}

#[test]
fn custom_zone_layout_drives_its_channels() {
    let mut config = LightingConfig::default();
    config.zones.clear();
    config
        .zones
        .push(ZoneConfig::new("porch", 30..32, EffectConfig::Steady))
        .expect("zone capacity");
    let (mut app, inputs, _sink, mut events) = make_app_with(config);
    let mut now = 0;

    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 600);
    assert_eq!(app.frame().get(31), 63);
    assert_eq!(app.frame().get(0), 0);
}
