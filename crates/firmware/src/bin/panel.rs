//! `panel` — BLE message panel with RSA key loading.
//!
//! Boot order matters: display first (so every later failure is visible),
//! then SD + key (non-fatal), then the radio (fatal to networking only).

#![no_std]
#![no_main]
// Boot-time init: a failure here leaves nothing to recover with.
#![allow(clippy::expect_used)]

use core::cell::RefCell;

use bluetooth::service::{READY_PLAIN, READY_SECURE};
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
use embedded_sdmmc::SdCard;

use firmware::boot::{load_vault, log_file_listing, BootStep, KeyLoadOutcome};
use firmware::controller::PanelController;
use firmware::display::Ili9342c;
use firmware::storage_sd::SdStorage;
use firmware::{ble, runtime};
use ui::{BootView, FaultView};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

fn show_boot<D>(display: &mut D, step: BootStep)
where
    D: embedded_graphics::prelude::DrawTarget<
        Color = embedded_graphics::pixelcolor::Rgb565,
    >,
{
    log::info!("{}", step.label());
    if (BootView { status: step.label() }).render(display).is_err() {
        log::warn!("boot paint failed");
    }
}

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger_from_env();
    log::info!("=== {} v{} ===", platform::config::APP_NAME, platform::config::APP_VERSION);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 96 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    // ── Display: shared SPI bus (VSPI), LCD on CS 14, SD on CS 4 ────────
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
        // Keep going headless; the serial log still tells the story.
        log::error!("display init failed: {e}");
    }
    backlight.set_high();

    show_boot(&mut display, BootStep::Starting);
    Timer::after_millis(500).await;

    // ── SD card + RSA key (both optional) ───────────────────────────────
    show_boot(&mut display, BootStep::Filesystem);
    let sd_cs = Output::new(peripherals.GPIO4, Level::High, OutputConfig::default());
    let sd_spi = RefCellDevice::new(&spi_bus, sd_cs, Delay::new()).expect("SD CS init failed");
    let mut storage = SdStorage::new(SdCard::new(sd_spi, Delay::new()));

    show_boot(&mut display, BootStep::Rsa);
    let (vault, outcome) = if storage.probe() {
        log_file_listing(&mut storage).await;
        load_vault(&mut storage).await
    } else {
        (crypto::RsaVault::disabled(), KeyLoadOutcome::MountFailed)
    };
    log::info!("{}", outcome.log_line());

    // ── Radio ───────────────────────────────────────────────────────────
    show_boot(&mut display, BootStep::Radio);
    let rng = esp_hal::rng::Rng::new(peripherals.RNG);
    let timg1 = TimerGroup::new(peripherals.TIMG1);
    let radio = match esp_radio::init(timg1.timer0, rng) {
        Ok(radio) => radio,
        Err(e) => {
            // Failure class (e): terminal. Red screen, idle forever.
            log::error!("BLE controller init failed: {e:?}");
            let _ = (FaultView { detail: "Init Failed" }).render(&mut display);
            loop {
                Timer::after_secs(1).await;
            }
        }
    };
    let transport = BleConnector::new(&radio, peripherals.BT);
    let controller = ExternalController::<_, { ble::HCI_SLOTS }>::new(transport);

    show_boot(&mut display, BootStep::Advertising);
    let ready_value = if vault.is_enabled() {
        READY_SECURE
    } else {
        READY_PLAIN
    };

    show_boot(&mut display, BootStep::Ready);
    let now = embassy_time::Instant::now().as_millis();
    let panel = PanelController::new(outcome.badge(), now);

    // The vault stays alive for the whole process. The write path shows
    // payloads as received; decryption is available to callers but the
    // shipped behaviour never routed the inbox through it.
    let _vault = vault;

    join(
        ble::run(controller, ready_value),
        runtime::drive(&mut display, panel),
    )
    .await;
}
