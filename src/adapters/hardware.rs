//! Hardware adapter: bridges the TLC594x driver to the [`FrameSink`] port.
//!
//! Zone levels are 6-bit (`0..=max_level`); the chip wants 12-bit
//! grayscale.  The mapping is quadratic so equal level steps look like
//! equal brightness steps to the eye: `gs = level² × 4095 / max²`.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::app::ports::FrameSink;
use crate::config::CHANNEL_COUNT;
use crate::drivers::tlc594x::{GS_MAX, Tlc594x};
use crate::error::TransportError;
use crate::lighting::Frame;

/// Perceptual level → 12-bit grayscale.
pub fn level_to_grayscale(level: u8, max_level: u8) -> u16 {
    if max_level == 0 {
        return 0;
    }
    let level = u32::from(level.min(max_level));
    let max = u32::from(max_level);
    (level * level * u32::from(GS_MAX) / (max * max)) as u16
}

/// [`FrameSink`] over a TLC594x on an embedded-hal SPI device.
pub struct Tlc5940Sink<SPI, XLAT, VPRG> {
    driver: Tlc594x<SPI, XLAT, VPRG>,
    max_level: u8,
}

impl<SPI, XLAT, VPRG> Tlc5940Sink<SPI, XLAT, VPRG>
where
    SPI: SpiDevice,
    XLAT: OutputPin,
    VPRG: OutputPin,
{
    pub fn new(driver: Tlc594x<SPI, XLAT, VPRG>, max_level: u8) -> Self {
        Self { driver, max_level }
    }

    pub fn driver(&self) -> &Tlc594x<SPI, XLAT, VPRG> {
        &self.driver
    }

    pub fn into_driver(self) -> Tlc594x<SPI, XLAT, VPRG> {
        self.driver
    }
}

impl<SPI, XLAT, VPRG> FrameSink for Tlc5940Sink<SPI, XLAT, VPRG>
where
    SPI: SpiDevice,
    XLAT: OutputPin,
    VPRG: OutputPin,
{
    fn write_channels(&mut self, frame: &Frame) -> Result<(), TransportError> {
        let mut gs = [0u16; CHANNEL_COUNT];
        for (slot, &level) in gs.iter_mut().zip(frame.as_slice()) {
            *slot = level_to_grayscale(level, self.max_level);
        }
        self.driver.write_grayscale(&gs)
    }

    fn set_dot_correction(&mut self, channel: u8, value: u8) {
        self.driver.set_dot_correction(channel, value);
    }

    fn write_dot_correction(&mut self) -> Result<(), TransportError> {
        self.driver.write_dot_correction()
    }
}
