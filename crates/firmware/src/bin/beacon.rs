//! `beacon` — minimal auto-readvertising peripheral.
//!
//! Notifies `"ping <n>"` every two seconds while connected and echoes any
//! characteristic write to the display. No SD card, no crypto.

#![no_std]
#![no_main]
// Boot-time init: a failure here leaves nothing to recover with.
#![allow(clippy::expect_used)]

use core::cell::RefCell;

use bt_hci::controller::ExternalController;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_time::Timer;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::spi::Mode as SpiMode;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::ble::controller::BleConnector;
use embedded_hal_bus::spi::RefCellDevice;

use firmware::controller::BeaconController;
use firmware::display::Ili9342c;
use firmware::{ble, runtime};
use ui::FaultView;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    log::info!("=== {} beacon v{} ===", platform::config::APP_NAME, platform::config::APP_VERSION);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 72 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    // ── Display ─────────────────────────────────────────────────────────
    let spi = Spi::new(
        peripherals.SPI2,
        SpiConfig::default()
            .with_frequency(Rate::from_mhz(20))
            .with_mode(SpiMode::_0),
    )
    .expect("SPI init failed")
    .with_sck(peripherals.GPIO18)
    .with_mosi(peripherals.GPIO23)
    .with_miso(peripherals.GPIO19);
    let spi_bus = RefCell::new(spi);

    let lcd_cs = Output::new(peripherals.GPIO14, Level::High, OutputConfig::default());
    let lcd_dc = Output::new(peripherals.GPIO27, Level::Low, OutputConfig::default());
    let lcd_rst = Output::new(peripherals.GPIO33, Level::High, OutputConfig::default());
    let mut backlight = Output::new(peripherals.GPIO32, Level::Low, OutputConfig::default());

    let lcd_spi = RefCellDevice::new(&spi_bus, lcd_cs, Delay::new()).expect("LCD CS init failed");
    let mut display = Ili9342c::new(lcd_spi, lcd_dc, lcd_rst, Delay::new());
    if let Err(e) = display.init() {
        log::error!("display init failed: {e}");
    }
    backlight.set_high();

    // ── Radio ───────────────────────────────────────────────────────────
    let rng = esp_hal::rng::Rng::new(peripherals.RNG);
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let radio = match esp_radio::init(timg1.timer0, rng) {
        Ok(radio) => radio,
        Err(e) => {
            log::error!("BLE controller init failed: {e:?}");
            let _ = (FaultView { detail: "Init Failed" }).render(&mut display);
            loop {
                Timer::after_secs(1).await;
            }
        }
    };
    let transport = BleConnector::new(&radio, peripherals.BT);
    let controller = ExternalController::<_, { ble::HCI_SLOTS }>::new(transport);

    let now = embassy_time::Instant::now().as_millis();
    let beacon = BeaconController::new(now);

    join(
        ble::run(controller, ""),
        runtime::drive(&mut display, beacon),
    )
    .await;
}
