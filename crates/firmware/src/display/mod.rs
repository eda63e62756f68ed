//! Display support: panel constants, the ILI9342C SPI driver, and the
//! glue that turns controller [`Render`] effects into `ui` view paints.

pub mod driver;

pub use driver::{DisplayError, Ili9342c};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::controller::Render;
use ui::{ConnectedView, MessageView, WaitingView};

/// Panel width in pixels (landscape).
pub const DISPLAY_WIDTH: u32 = 320;

/// Panel height in pixels (landscape).
pub const DISPLAY_HEIGHT: u32 = 240;

/// Paint one controller render effect onto any RGB565 target.
///
/// Used by both binaries and the desktop emulator; display errors bubble to
/// the caller, which logs and carries on (the panel is best-effort).
pub fn paint<D>(target: &mut D, render: &Render) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match render {
        Render::Waiting {
            rsa,
            uptime_s,
            messages,
        } => WaitingView {
            rsa: *rsa,
            uptime_s: *uptime_s,
            messages: *messages,
        }
        .render(target),
        Render::TimeRow {
            rsa,
            uptime_s,
            messages,
        } => WaitingView {
            rsa: *rsa,
            uptime_s: *uptime_s,
            messages: *messages,
        }
        .render_time_row(target),
        Render::Connected { rsa } => ConnectedView { rsa: *rsa }.render(target),
        Render::Message { count, body } => MessageView {
            count: *count,
            body: body.as_str(),
        }
        .render(target),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::paint;
    use crate::controller::Render;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::pixelcolor::Rgb565;
    use ui::RsaBadge;

    #[test]
    fn test_paint_covers_every_render_variant() {
        let renders = [
            Render::Waiting {
                rsa: Some(RsaBadge::Enabled),
                uptime_s: 3,
                messages: 1,
            },
            Render::TimeRow {
                rsa: Some(RsaBadge::Enabled),
                uptime_s: 8,
                messages: 1,
            },
            Render::Connected { rsa: None },
            Render::Message {
                count: 2,
                body: heapless::String::try_from("hi").unwrap(),
            },
        ];
        for render in &renders {
            let mut display: MockDisplay<Rgb565> = MockDisplay::new();
            display.set_allow_overdraw(true);
            display.set_allow_out_of_bounds_drawing(true);
            paint(&mut display, render).unwrap();
        }
    }
}
