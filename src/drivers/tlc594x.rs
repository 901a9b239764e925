//! TLC594x constant-current LED driver (two daisy-chained 16-channel chips).
//!
//! ## Wiring
//!
//! | Signal | Pin                 | Role                                   |
//! |--------|---------------------|----------------------------------------|
//! | SCLK   | [`LED_SCLK_GPIO`]   | SPI clock                              |
//! | SIN    | [`LED_MOSI_GPIO`]   | SPI data                               |
//! | XLAT   | [`LED_XLAT_GPIO`]   | rising edge latches the shift register |
//! | VPRG   | [`LED_VPRG_GPIO`]   | HIGH selects the dot-correction register |
//! | GSCLK  | [`LED_GSCLK_GPIO`]  | grayscale PWM clock (LEDC)             |
//! | BLANK  | [`LED_BLANK_GPIO`]  | pulse restarts the PWM cycle           |
//!
//! GSCLK and BLANK are not owned by this driver: `hw_init` starts GSCLK on
//! LEDC at [`gsclk_hz`] and the refresh timer pulses BLANK once per period,
//! so each 4096-count grayscale cycle completes inside one refresh period.
//!
//! ## Shift format
//!
//! Data goes out MSB first, highest channel first, so channel 31 ends up
//! in the far chip.  Grayscale is 12 bits per channel (48 bytes for 32
//! channels); dot correction is 6 bits per channel (24 bytes).
//!
//! [`LED_SCLK_GPIO`]: crate::pins::LED_SCLK_GPIO
//! [`LED_MOSI_GPIO`]: crate::pins::LED_MOSI_GPIO
//! [`LED_XLAT_GPIO`]: crate::pins::LED_XLAT_GPIO
//! [`LED_VPRG_GPIO`]: crate::pins::LED_VPRG_GPIO
//! [`LED_GSCLK_GPIO`]: crate::pins::LED_GSCLK_GPIO
//! [`LED_BLANK_GPIO`]: crate::pins::LED_BLANK_GPIO

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::config::{CHANNEL_COUNT, MAX_LEVEL};
use crate::error::TransportError;

/// Bytes in one grayscale frame.
pub const GS_FRAME_BYTES: usize = CHANNEL_COUNT * 12 / 8;
/// Bytes in one dot-correction frame.
pub const DC_FRAME_BYTES: usize = CHANNEL_COUNT * 6 / 8;
/// Full-scale 12-bit grayscale.
pub const GS_MAX: u16 = 4095;
/// GSCLK counts in one grayscale PWM cycle.
pub const GS_CYCLE_COUNTS: u64 = 4096;

/// GSCLK frequency that fits one full grayscale cycle, plus about 3 %
/// headroom, into each BLANK period of `refresh_period_us`.
pub fn gsclk_hz(refresh_period_us: u64) -> u32 {
    let period_us = refresh_period_us.max(1);
    let exact = (GS_CYCLE_COUNTS * 1_000_000).div_ceil(period_us);
    (exact * 33 / 32).min(u64::from(u32::MAX)) as u32
}

pub struct Tlc594x<SPI, XLAT, VPRG> {
    spi: SPI,
    xlat: XLAT,
    vprg: VPRG,
    dot: [u8; CHANNEL_COUNT],
}

impl<SPI, XLAT, VPRG> Tlc594x<SPI, XLAT, VPRG>
where
    SPI: SpiDevice,
    XLAT: OutputPin,
    VPRG: OutputPin,
{
    /// Dot correction starts at full current on every channel.
    pub fn new(spi: SPI, xlat: XLAT, vprg: VPRG) -> Self {
        Self {
            spi,
            xlat,
            vprg,
            dot: [MAX_LEVEL; CHANNEL_COUNT],
        }
    }

    /// Shift out and latch one grayscale value per channel.
    pub fn write_grayscale(&mut self, gs: &[u16; CHANNEL_COUNT]) -> Result<(), TransportError> {
        self.vprg.set_low().map_err(|_| TransportError::Pin)?;
        let bytes = pack_grayscale(gs);
        self.spi.write(&bytes).map_err(|_| TransportError::Spi)?;
        self.latch()
    }

    /// Stage a 6-bit dot-correction value.  Out-of-range channels are ignored.
    pub fn set_dot_correction(&mut self, channel: u8, value: u8) {
        if let Some(slot) = self.dot.get_mut(usize::from(channel)) {
            *slot = value.min(MAX_LEVEL);
        }
    }

    pub fn dot_correction(&self, channel: u8) -> u8 {
        self.dot.get(usize::from(channel)).copied().unwrap_or(0)
    }

    /// Shift out and latch the staged dot-correction values.
    pub fn write_dot_correction(&mut self) -> Result<(), TransportError> {
        self.vprg.set_high().map_err(|_| TransportError::Pin)?;
        let bytes = pack_dot_correction(&self.dot);
        let written = self
            .spi
            .write(&bytes)
            .map_err(|_| TransportError::Spi)
            .and_then(|()| self.latch());
        // VPRG goes back low even after a failed shift so the next
        // grayscale frame lands in the right register.
        self.vprg.set_low().map_err(|_| TransportError::Pin)?;
        written
    }

    fn latch(&mut self) -> Result<(), TransportError> {
        self.xlat.set_high().map_err(|_| TransportError::Pin)?;
        self.xlat.set_low().map_err(|_| TransportError::Pin)
    }

    /// Hand the peripherals back.
    pub fn release(self) -> (SPI, XLAT, VPRG) {
        (self.spi, self.xlat, self.vprg)
    }
}

/// Pack 12-bit values, two channels per three bytes, highest channel first.
pub fn pack_grayscale(gs: &[u16; CHANNEL_COUNT]) -> [u8; GS_FRAME_BYTES] {
    let mut out = [0u8; GS_FRAME_BYTES];
    for (pair, chunk) in out.chunks_exact_mut(3).enumerate() {
        let hi = gs[CHANNEL_COUNT - 1 - 2 * pair].min(GS_MAX);
        let lo = gs[CHANNEL_COUNT - 2 - 2 * pair].min(GS_MAX);
        chunk[0] = (hi >> 4) as u8;
        chunk[1] = (((hi & 0x0F) << 4) | (lo >> 8)) as u8;
        chunk[2] = (lo & 0xFF) as u8;
    }
    out
}

/// Pack 6-bit values, four channels per three bytes, highest channel first.
pub fn pack_dot_correction(dc: &[u8; CHANNEL_COUNT]) -> [u8; DC_FRAME_BYTES] {
    let mut out = [0u8; DC_FRAME_BYTES];
    for (quad, chunk) in out.chunks_exact_mut(3).enumerate() {
        let bits = (0..4).fold(0u32, |acc, k| {
            let channel = CHANNEL_COUNT - 1 - 4 * quad - k;
            (acc << 6) | u32::from(dc[channel] & 0x3F)
        });
        chunk[0] = (bits >> 16) as u8;
        chunk[1] = (bits >> 8) as u8;
        chunk[2] = bits as u8;
    }
    out
}
