//! Per-screen colour themes.
//!
//! The original device used background colour as the primary state signal:
//! blue means waiting, green means a peer is on the line, red means the
//! radio never came up. Companion-app screenshots and user docs assume
//! these colours; treat them as part of the product, not decoration.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::screen::Screen;

/// Foreground/background pair for one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Full-screen background.
    pub background: Rgb565,
    /// Primary text colour.
    pub text: Rgb565,
    /// Accent colour for counters and badges.
    pub accent: Rgb565,
}

impl Screen {
    /// The colour theme for this screen.
    #[must_use]
    pub fn theme(self) -> Theme {
        match self {
            Screen::Boot => Theme {
                background: Rgb565::BLACK,
                text: Rgb565::WHITE,
                accent: Rgb565::GREEN,
            },
            Screen::Waiting => Theme {
                background: Rgb565::BLUE,
                text: Rgb565::WHITE,
                accent: Rgb565::YELLOW,
            },
            Screen::Connected | Screen::Message => Theme {
                background: Rgb565::GREEN,
                text: Rgb565::WHITE,
                accent: Rgb565::YELLOW,
            },
            Screen::Fault => Theme {
                background: Rgb565::RED,
                text: Rgb565::WHITE,
                accent: Rgb565::YELLOW,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_colours_match_product_contract() {
        assert_eq!(Screen::Waiting.theme().background, Rgb565::BLUE);
        assert_eq!(Screen::Connected.theme().background, Rgb565::GREEN);
        assert_eq!(Screen::Message.theme().background, Rgb565::GREEN);
        assert_eq!(Screen::Fault.theme().background, Rgb565::RED);
        assert_eq!(Screen::Boot.theme().background, Rgb565::BLACK);
    }
}
