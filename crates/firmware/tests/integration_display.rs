//! Display driver integration tests — exact wire traffic over mocked SPI.
//!
//! Run with: cargo test -p firmware --test integration_display

#![allow(clippy::unwrap_used, clippy::expect_used)]

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use firmware::display::{Ili9342c, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// The three SPI expectations produced by one `SpiDevice::write` call.
fn spi_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(data.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

fn idle_pin() -> PinMock {
    PinMock::new(&[])
}

#[test]
fn test_panel_dimensions() {
    assert_eq!(DISPLAY_WIDTH, 320);
    assert_eq!(DISPLAY_HEIGHT, 240);
}

#[test]
fn test_fill_rect_emits_window_then_pixels() {
    // 2x1 red fill at the origin:
    //   CASET 0..=1, PASET 0..=0, RAMWR, two big-endian 0xF800 pixels.
    let mut spi_expect: Vec<SpiTransaction<u8>> = Vec::new();
    spi_expect.extend(spi_write(&[0x2A]));
    spi_expect.extend(spi_write(&[0x00, 0x00, 0x00, 0x01]));
    spi_expect.extend(spi_write(&[0x2B]));
    spi_expect.extend(spi_write(&[0x00, 0x00, 0x00, 0x00]));
    spi_expect.extend(spi_write(&[0x2C]));
    spi_expect.extend(spi_write(&[0xF8, 0x00, 0xF8, 0x00]));

    let dc_expect = [
        PinTransaction::set(PinState::Low),  // CASET
        PinTransaction::set(PinState::High), // CASET params
        PinTransaction::set(PinState::Low),  // PASET
        PinTransaction::set(PinState::High), // PASET params
        PinTransaction::set(PinState::Low),  // RAMWR
        PinTransaction::set(PinState::High), // pixel data
    ];

    let mut spi = SpiMock::new(&spi_expect);
    let mut dc = PinMock::new(&dc_expect);
    let mut rst = idle_pin();

    let mut driver = Ili9342c::new(spi.clone(), dc.clone(), rst.clone(), NoopDelay);
    driver
        .fill_rect(
            &Rectangle::new(Point::zero(), Size::new(2, 1)),
            Rgb565::RED,
        )
        .unwrap();

    spi.done();
    dc.done();
    rst.done();
}

#[test]
fn test_fill_rect_outside_panel_is_silent() {
    let mut spi = SpiMock::new(&[]);
    let mut dc = idle_pin();
    let mut rst = idle_pin();

    let mut driver = Ili9342c::new(spi.clone(), dc.clone(), rst.clone(), NoopDelay);
    driver
        .fill_rect(
            &Rectangle::new(Point::new(400, 300), Size::new(4, 4)),
            Rgb565::RED,
        )
        .unwrap();

    spi.done();
    dc.done();
    rst.done();
}

#[test]
fn test_draw_iter_writes_single_pixel_window() {
    // One blue pixel at (5, 7): window 5..=5 x 7..=7, pixel 0x001F.
    let mut spi_expect: Vec<SpiTransaction<u8>> = Vec::new();
    spi_expect.extend(spi_write(&[0x2A]));
    spi_expect.extend(spi_write(&[0x00, 0x05, 0x00, 0x05]));
    spi_expect.extend(spi_write(&[0x2B]));
    spi_expect.extend(spi_write(&[0x00, 0x07, 0x00, 0x07]));
    spi_expect.extend(spi_write(&[0x2C]));
    spi_expect.extend(spi_write(&[0x00, 0x1F]));

    let dc_expect = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];

    let mut spi = SpiMock::new(&spi_expect);
    let mut dc = PinMock::new(&dc_expect);
    let mut rst = idle_pin();

    let mut driver = Ili9342c::new(spi.clone(), dc.clone(), rst.clone(), NoopDelay);
    driver
        .draw_iter([Pixel(Point::new(5, 7), Rgb565::BLUE)])
        .unwrap();
    // Off-panel pixels are dropped before any traffic.
    driver
        .draw_iter([Pixel(Point::new(-1, 0), Rgb565::BLUE)])
        .unwrap();

    spi.done();
    dc.done();
    rst.done();
}

#[test]
fn test_init_sequence() {
    // Hardware reset pulse on RST, then the mode commands in order.
    let rst_expect = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];

    let mut spi_expect: Vec<SpiTransaction<u8>> = Vec::new();
    spi_expect.extend(spi_write(&[0x01])); // SWRESET
    spi_expect.extend(spi_write(&[0x11])); // SLPOUT
    spi_expect.extend(spi_write(&[0x3A])); // COLMOD
    spi_expect.extend(spi_write(&[0x55])); //   16 bpp
    spi_expect.extend(spi_write(&[0x36])); // MADCTL
    spi_expect.extend(spi_write(&[0x08])); //   landscape BGR
    spi_expect.extend(spi_write(&[0x21])); // INVON
    spi_expect.extend(spi_write(&[0x29])); // DISPON

    let dc_expect = [
        PinTransaction::set(PinState::Low),  // SWRESET
        PinTransaction::set(PinState::Low),  // SLPOUT
        PinTransaction::set(PinState::Low),  // COLMOD
        PinTransaction::set(PinState::High), //   param
        PinTransaction::set(PinState::Low),  // MADCTL
        PinTransaction::set(PinState::High), //   param
        PinTransaction::set(PinState::Low),  // INVON
        PinTransaction::set(PinState::Low),  // DISPON
    ];

    let mut spi = SpiMock::new(&spi_expect);
    let mut dc = PinMock::new(&dc_expect);
    let mut rst = PinMock::new(&rst_expect);

    let mut driver = Ili9342c::new(spi.clone(), dc.clone(), rst.clone(), NoopDelay);
    driver.init().unwrap();

    spi.done();
    dc.done();
    rst.done();
}
