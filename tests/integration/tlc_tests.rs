//! Integration tests for LightingService → Tlc5940Sink → SPI/GPIO.
//!
//! Verifies the bytes and latch sequence the driver chain produces for
//! real service output, using recording embedded-hal mocks.

use crate::mock_hw::{MockPin, MockSpi, RecordingSink, advance};

use motionlight::adapters::hardware::Tlc5940Sink;
use motionlight::app::commands::LightCommand;
use motionlight::app::events::AppEvent;
use motionlight::app::service::LightingService;
use motionlight::config::LightingConfig;
use motionlight::drivers::tlc594x::{DC_FRAME_BYTES, GS_FRAME_BYTES, Tlc594x};
use motionlight::error::TransportError;
use motionlight::fsm::StateId;
use motionlight::inputs::SharedInputs;

type TestSink = Tlc5940Sink<MockSpi, MockPin, MockPin>;

fn make_sink(spi: MockSpi) -> TestSink {
    Tlc5940Sink::new(Tlc594x::new(spi, MockPin::default(), MockPin::default()), 63)
}

fn make_app() -> (LightingService, SharedInputs, RecordingSink) {
    let config = LightingConfig::default();
    let inputs = SharedInputs::new();
    inputs.init(&config);
    let app = LightingService::new(config).expect("valid config");
    (app, inputs, RecordingSink::new())
}

#[test]
fn start_writes_dot_correction_then_blank_frame() {
    let (mut app, _inputs, mut events) = make_app();
    let mut sink = make_sink(MockSpi::default());
    app.start(0, &mut sink, &mut events);

    let (spi, xlat, vprg) = sink.into_driver().release();
    assert_eq!(spi.writes.len(), 2);
    assert_eq!(spi.writes[0], vec![0xFF; DC_FRAME_BYTES], "full dot correction");
    assert_eq!(spi.writes[1], vec![0x00; GS_FRAME_BYTES], "dark frame");
    assert_eq!(xlat.rising_edges(), 2, "one latch per write");
    assert!(!xlat.is_high());
    assert_eq!(vprg.history, vec![true, false, false]);
}

#[test]
fn steady_frame_maps_full_level_to_full_grayscale() {
    let (mut app, inputs, mut events) = make_app();
    let mut sink = make_sink(MockSpi::default());
    app.start(0, &mut sink, &mut events);

    let mut now = 0;
    inputs.on_motion_edge();
    advance(&mut app, &inputs, &mut events, &mut now, 600);
    assert_eq!(app.state(), StateId::SteadyOn);
    app.refresh(&mut sink, &mut events);

    let (spi, _xlat, _vprg) = sink.into_driver().release();
    let frame = spi.writes.last().expect("frame written");
    assert_eq!(frame.len(), GS_FRAME_BYTES);
    // Channels 31/30 are unassigned and shift out first.
    assert_eq!(&frame[..3], &[0x00, 0x00, 0x00]);
    // Channels 11/10 (red) and 1/0 (white).
    assert_eq!(&frame[30..33], &[0xFF, 0xFF, 0xFF]);
    assert_eq!(&frame[45..], &[0xFF, 0xFF, 0xFF]);
}

#[test]
fn half_brightness_rewrites_dot_correction() {
    let (mut app, inputs, mut events) = make_app();
    let mut sink = make_sink(MockSpi::default());
    app.start(0, &mut sink, &mut events);

    app.handle_command(LightCommand::ToggleHalfBrightness, &inputs, &mut events);
    app.refresh(&mut sink, &mut events);
    assert_eq!(sink.driver().dot_correction(7), 31);

    let (spi, _xlat, vprg) = sink.into_driver().release();
    assert_eq!(spi.writes.len(), 4);
    // 011111 × 4 per three bytes.
    let expected: Vec<u8> = [0x7D, 0xF7, 0xDF].repeat(DC_FRAME_BYTES / 3);
    assert_eq!(spi.writes[2], expected);
    assert_eq!(vprg.history, vec![true, false, false, true, false, false]);
}

#[test]
fn spi_failure_reports_fault_and_restores_vprg() {
    let (mut app, _inputs, mut events) = make_app();
    let mut sink = make_sink(MockSpi {
        fail: true,
        ..MockSpi::default()
    });
    app.start(0, &mut sink, &mut events);

    assert_eq!(
        events.count(|e| *e == AppEvent::TransportFault(TransportError::Spi)),
        2,
        "dot correction and frame both failed"
    );
    assert!(app.dot_correction_pending());

    let (spi, _xlat, vprg) = sink.into_driver().release();
    assert!(spi.writes.is_empty());
    assert_eq!(vprg.history.last(), Some(&false));
}
