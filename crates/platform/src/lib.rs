//! Platform abstractions for the BLE Message Panel
//!
//! This crate holds the hardware-independent seams of the firmware: the
//! storage traits the key loader reads through, the application constants,
//! and in-memory mocks so everything above the hardware layer tests on the
//! host.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Feature Layers (bluetooth, crypto, ui)
//!         ↓
//! Platform seams (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (esp-hal + embedded-sdmmc)
//! ```
//!
//! The [`mocks`] module ships in the crate proper (it is `no_std`-clean) so
//! that downstream crates' integration tests can use it without feature
//! gymnastics.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // single-threaded executor: Send bounds not needed

pub mod config;
pub mod mocks;
pub mod storage;

pub use storage::{read_to_vec, File, Storage, StorageError};
