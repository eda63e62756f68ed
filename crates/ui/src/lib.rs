//! Panel UI layer — screen definitions, themes, view models, rendering.
//!
//! Rendering is a pure side-effecting function of a view model over any
//! `DrawTarget<Color = Rgb565>`: the same code paints the ILI9342C on the
//! device, the desktop simulator window, and the mock display in tests.
//!
//! This crate is `no_std` by default.

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod screen;
pub mod theme;
pub mod views;

pub use screen::Screen;
pub use views::{
    BootView, ConnectedView, FaultView, MessageView, RsaBadge, WaitingView,
};
