//! ILI9342C driver — the 320x240 IPS panel on the M5Stack core units.
//!
//! Blocking SPI, command/data multiplexed over the DC pin, pixels pushed
//! as big-endian RGB565. The driver is generic over the embedded-hal 1.x
//! `SpiDevice`/`OutputPin`/`DelayNs` traits, so it runs against esp-hal on
//! the device and against `embedded-hal-mock` in the integration tests.
//!
//! Pixel pushes go through [`Ili9342c::fill_rect`] windows; the
//! `DrawTarget` impl falls back to per-pixel windows for arbitrary
//! geometry, which is plenty for the status-text workloads this firmware
//! draws.

use embedded_graphics::pixelcolor::raw::ToBytes as _;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use super::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

// Command opcodes (ILI9342C datasheet §8).
const CMD_SWRESET: u8 = 0x01;
const CMD_SLPOUT: u8 = 0x11;
const CMD_INVON: u8 = 0x21;
const CMD_DISPON: u8 = 0x29;
const CMD_CASET: u8 = 0x2A;
const CMD_PASET: u8 = 0x2B;
const CMD_RAMWR: u8 = 0x2C;
const CMD_MADCTL: u8 = 0x36;
const CMD_COLMOD: u8 = 0x3A;

// BGR subpixel order, native landscape origin.
const MADCTL_LANDSCAPE_BGR: u8 = 0x08;

// 16-bit RGB565 over SPI.
const COLMOD_16BPP: u8 = 0x55;

// Pixels pushed per SPI write while filling.
const FILL_CHUNK_PIXELS: usize = 32;

/// Driver failure classes. Which pin or transfer failed is in the log, not
/// in the type; callers treat the display as best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
pub enum DisplayError {
    /// SPI transfer failed.
    #[error("display SPI transfer failed")]
    Spi,
    /// DC or RST pin toggle failed.
    #[error("display control pin failed")]
    Pin,
}

/// ILI9342C over a shared SPI bus.
pub struct Ili9342c<SPI, DC, RST, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: D,
}

impl<SPI, DC, RST, D> Ili9342c<SPI, DC, RST, D>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Wrap the bus and control pins. Call [`init`](Self::init) before
    /// drawing.
    pub fn new(spi: SPI, dc: DC, rst: RST, delay: D) -> Self {
        Self { spi, dc, rst, delay }
    }

    /// Hardware reset followed by the minimal mode sequence: sleep-out,
    /// 16 bpp, landscape BGR, inversion on (the M5 panel ships inverted),
    /// display on.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(5);
        self.rst.set_low().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DisplayError::Pin)?;
        self.delay.delay_ms(120);

        self.command(CMD_SWRESET, &[])?;
        self.delay.delay_ms(120);
        self.command(CMD_SLPOUT, &[])?;
        self.delay.delay_ms(120);
        self.command(CMD_COLMOD, &[COLMOD_16BPP])?;
        self.command(CMD_MADCTL, &[MADCTL_LANDSCAPE_BGR])?;
        self.command(CMD_INVON, &[])?;
        self.command(CMD_DISPON, &[])?;
        self.delay.delay_ms(20);
        Ok(())
    }

    fn command(&mut self, op: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::Pin)?;
        self.spi.write(&[op]).map_err(|_| DisplayError::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| DisplayError::Pin)?;
            self.spi.write(params).map_err(|_| DisplayError::Spi)?;
        }
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::Pin)?;
        self.spi.write(bytes).map_err(|_| DisplayError::Spi)
    }

    /// Inclusive address window for the next RAM write.
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), DisplayError> {
        self.command(
            CMD_CASET,
            &[
                (x0 >> 8) as u8,
                (x0 & 0xFF) as u8,
                (x1 >> 8) as u8,
                (x1 & 0xFF) as u8,
            ],
        )?;
        self.command(
            CMD_PASET,
            &[
                (y0 >> 8) as u8,
                (y0 & 0xFF) as u8,
                (y1 >> 8) as u8,
                (y1 & 0xFF) as u8,
            ],
        )
    }

    /// Fill a rectangle, clipped to the panel, with one colour.
    pub fn fill_rect(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(()); // zero-sized after clipping
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // clipped to the 320x240 panel above, so coordinates fit u16
        self.set_window(
            clipped.top_left.x as u16,
            clipped.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
        )?;
        self.command(CMD_RAMWR, &[])?;

        let be = color.to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair.copy_from_slice(&be);
        }

        let mut remaining = (clipped.size.width as usize).saturating_mul(clipped.size.height as usize);
        while remaining > 0 {
            let now = remaining.min(FILL_CHUNK_PIXELS);
            let bytes = chunk.get(..now.saturating_mul(2)).ok_or(DisplayError::Spi)?;
            self.data(bytes)?;
            remaining = remaining.saturating_sub(now);
        }
        Ok(())
    }

}

impl<SPI, DC, RST, D> OriginDimensions for Ili9342c<SPI, DC, RST, D> {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl<SPI, DC, RST, D> DrawTarget for Ili9342c<SPI, DC, RST, D>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            // contains() above guarantees 0 <= x < 320, 0 <= y < 240
            let (x, y) = (point.x as u16, point.y as u16);
            self.set_window(x, y, x, y)?;
            self.command(CMD_RAMWR, &[])?;
            self.data(&color.to_be_bytes())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_rect(&self.bounding_box(), color)
    }
}
