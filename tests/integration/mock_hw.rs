//! Mock hardware adapters for integration tests.
//!
//! Records every driver call so tests can assert on the full command
//! history without touching real SPI/GPIO registers.

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorKind, ErrorType as SpiErrorType, Operation, SpiDevice};

use motionlight::app::events::AppEvent;
use motionlight::app::ports::{EventSink, FrameSink, PowerPort};
use motionlight::app::service::LightingService;
use motionlight::config::CHANNEL_COUNT;
use motionlight::error::TransportError;
use motionlight::inputs::SharedInputs;
use motionlight::lighting::Frame;

// ── MockFrameSink ─────────────────────────────────────────────

/// Port-level sink: keeps every frame and the last dot correction.
#[derive(Default)]
pub struct MockFrameSink {
    pub frames: Vec<[u8; CHANNEL_COUNT]>,
    pub dot: Vec<u8>,
    pub dot_writes: usize,
    pub fail_frames: bool,
    pub fail_dot: bool,
}

#[allow(dead_code)]
impl MockFrameSink {
    pub fn new() -> Self {
        Self {
            dot: vec![0; CHANNEL_COUNT],
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> Option<&[u8; CHANNEL_COUNT]> {
        self.frames.last()
    }
}

impl FrameSink for MockFrameSink {
    fn write_channels(&mut self, frame: &Frame) -> Result<(), TransportError> {
        if self.fail_frames {
            return Err(TransportError::Spi);
        }
        let mut copy = [0u8; CHANNEL_COUNT];
        copy.copy_from_slice(frame.as_slice());
        self.frames.push(copy);
        Ok(())
    }

    fn set_dot_correction(&mut self, channel: u8, value: u8) {
        if let Some(slot) = self.dot.get_mut(usize::from(channel)) {
            *slot = value;
        }
    }

    fn write_dot_correction(&mut self) -> Result<(), TransportError> {
        if self.fail_dot {
            return Err(TransportError::Spi);
        }
        self.dot_writes += 1;
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── MockPower ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPower {
    pub sleeps: u32,
}

impl PowerPort for MockPower {
    fn enter_low_power(&mut self) {
        self.sleeps += 1;
    }
}

// ── MockSpi / MockPin ─────────────────────────────────────────

/// embedded-hal SPI device that records each write.
#[derive(Default)]
pub struct MockSpi {
    pub writes: Vec<Vec<u8>>,
    pub fail: bool,
}

impl SpiErrorType for MockSpi {
    type Error = ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                self.writes.push(bytes.to_vec());
            }
        }
        Ok(())
    }
}

/// Output pin that records its level history.
#[derive(Default)]
pub struct MockPin {
    pub history: Vec<bool>,
}

#[allow(dead_code)]
impl MockPin {
    pub fn is_high(&self) -> bool {
        self.history.last().copied().unwrap_or(false)
    }

    pub fn rising_edges(&self) -> usize {
        let mut level = false;
        let mut edges = 0;
        for &h in &self.history {
            if h && !level {
                edges += 1;
            }
            level = h;
        }
        edges
    }
}

impl PinErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.history.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.history.push(true);
        Ok(())
    }
}

// ── Simulation helpers ────────────────────────────────────────

/// Drive the 1 ms tick and one service pass per millisecond for `ms`.
#[allow(dead_code)]
pub fn advance(
    app: &mut LightingService,
    inputs: &SharedInputs,
    events: &mut RecordingSink,
    now: &mut u32,
    ms: u32,
) {
    for _ in 0..ms {
        *now += 1;
        inputs.on_tick(1);
        app.tick(*now, inputs, events);
    }
}
