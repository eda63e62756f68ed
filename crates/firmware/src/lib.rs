//! BLE Message Panel firmware
//!
//! Firmware for an M5Stack-class ESP32 with a 320x240 LCD. Two binaries:
//!
//! - `panel` — receives writes on a single GATT characteristic, shows them
//!   on screen, counts them, acks with a notification. Loads an RSA private
//!   key from the SD card at boot and runs visibly degraded without it.
//! - `beacon` — minimal auto-readvertising peripheral that notifies
//!   `"ping <n>"` every two seconds while connected.
//!
//! # Architecture
//!
//! ```text
//! Binaries (src/bin/panel.rs, src/bin/beacon.rs)
//!         ↓
//! Controllers (controller module — pure effect machines)
//!         ↓
//! Feature crates (bluetooth, crypto, ui) + platform seams
//!         ↓
//! Hardware layer (esp-hal, trouble-host, embedded-sdmmc)
//! ```
//!
//! The controllers and the display driver build and test on the host; the
//! radio and the binaries sit behind the `hardware` feature.
//!
//! # Features
//!
//! - `hardware` — build for the ESP32 target (esp-hal, trouble-host)
//! - `emulator` — desktop rendition via embedded-graphics-simulator
//! - `std` — standard library (emulator and tests)
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target xtensa-esp32-none-elf --features hardware
//! ```
//!
//! ## Emulator Target
//!
//! ```bash
//! cargo run --example panel_emulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer log/tracing over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod boot;
pub mod controller;
pub mod display;

#[cfg(feature = "hardware")]
pub mod ble;

#[cfg(feature = "hardware")]
pub mod runtime;

#[cfg(feature = "hardware")]
pub mod storage_sd;

// Re-export key types
pub use controller::{BeaconController, Effect, Effects, PanelController, Render};
pub use display::{Ili9342c, DISPLAY_HEIGHT, DISPLAY_WIDTH};
