//! Fuzz target: interrupt storms against `LightingService`
//!
//! Interprets each byte as one input event (motion edge, button level,
//! or a burst of elapsed milliseconds) and drives the full service with
//! it.  Asserts that no sequence panics, that no channel ever exceeds the
//! configured maximum, and that the lights are dark whenever the
//! scheduler reports idle and settled.
//!
//! cargo fuzz run fuzz_input_storm

#![no_main]

use libfuzzer_sys::fuzz_target;
use motionlight::app::events::AppEvent;
use motionlight::app::ports::{EventSink, FrameSink};
use motionlight::app::service::LightingService;
use motionlight::config::LightingConfig;
use motionlight::error::TransportError;
use motionlight::fsm::StateId;
use motionlight::inputs::SharedInputs;
use motionlight::lighting::Frame;

struct NullSink;

impl FrameSink for NullSink {
    fn write_channels(&mut self, _frame: &Frame) -> Result<(), TransportError> {
        Ok(())
    }
    fn set_dot_correction(&mut self, _channel: u8, _value: u8) {}
    fn write_dot_correction(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

struct NullEvents;

impl EventSink for NullEvents {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = LightingConfig::default();
    let max_level = config.max_level;
    let inputs = SharedInputs::new();
    inputs.init(&config);
    let Ok(mut app) = LightingService::new(config) else {
        return;
    };
    let mut sink = NullSink;
    let mut events = NullEvents;
    let mut now = 0u32;
    app.start(now, &mut sink, &mut events);

    for &byte in data {
        match byte >> 6 {
            0 => inputs.on_motion_edge(),
            1 => inputs.on_button_edge(byte & 1 != 0),
            // Up to 63 ms of ticks, or up to ~8 s in 128 ms strides.
            2 => {
                for _ in 0..(byte & 0x3F) {
                    now = now.wrapping_add(1);
                    inputs.on_tick(1);
                    app.tick(now, &inputs, &mut events);
                }
            }
            _ => {
                let elapsed = u32::from(byte & 0x3F) * 128;
                now = now.wrapping_add(elapsed);
                inputs.on_tick(elapsed);
                app.tick(now, &inputs, &mut events);
            }
        }

        assert!(app.frame().as_slice().iter().all(|&l| l <= max_level));
        if app.state() == StateId::Idle && app.lights().all_settled() {
            assert!(app.lights().all_dark(), "idle and settled but lit");
        }
        if app.tick_count() % 16 == 0 {
            app.refresh(&mut sink, &mut events);
        }
    }
});
