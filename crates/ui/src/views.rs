//! View models and their renderers.
//!
//! Each view owns exactly the data it paints. Rendering clears the target
//! to the screen's theme colour and draws absolutely-positioned labels —
//! the layout grid (x = 10, rows at y = 20/60/100/160) is carried over
//! from the shipped device so existing photos and docs stay accurate.

use core::fmt::Write as _;

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use embedded_text::style::TextBoxStyleBuilder;
use embedded_text::TextBox;

use crate::screen::Screen;

/// Whether the decrypt feature is available, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaBadge {
    /// A private key is loaded.
    Enabled,
    /// Running degraded: no key, plain text only.
    Disabled,
}

impl RsaBadge {
    /// Badge text for the waiting screen.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RsaBadge::Enabled => "RSA: Enabled",
            RsaBadge::Disabled => "RSA: Disabled",
        }
    }

    /// Badge text for the connected screen.
    #[must_use]
    pub fn ready_label(self) -> &'static str {
        match self {
            RsaBadge::Enabled => "RSA: Ready",
            RsaBadge::Disabled => "RSA: Disabled",
        }
    }
}

/// A short formatted line such as `Count: 12`.
pub type Line = heapless::String<24>;

/// `Time: <secs>s`
#[must_use]
pub fn time_line(uptime_s: u32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Time: {uptime_s}s");
    line
}

/// `Messages: <n>`
#[must_use]
pub fn messages_line(count: u32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Messages: {count}");
    line
}

/// `Count: <n>`
#[must_use]
pub fn count_line(count: u32) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "Count: {count}");
    line
}

fn label<D>(target: &mut D, text: &str, x: i32, y: i32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(&FONT_10X20, color);
    Text::new(text, Point::new(x, y), style).draw(target)?;
    Ok(())
}

/// Boot progress: one status line on black.
#[derive(Debug, Clone, Copy)]
pub struct BootView<'a> {
    /// Current boot step label, e.g. `Init RSA...`.
    pub status: &'a str,
}

impl BootView<'_> {
    /// Paint the view.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = Screen::Boot.theme();
        target.clear(theme.background)?;
        label(target, self.status, 10, 20, theme.text)
    }
}

/// Advertising, nobody connected.
#[derive(Debug, Clone, Copy)]
pub struct WaitingView {
    /// Decrypt availability badge; `None` on firmware without the feature.
    pub rsa: Option<RsaBadge>,
    /// Seconds since boot, shown on the 5 s idle refresh.
    pub uptime_s: u32,
    /// Total accepted messages this session; the row is omitted at zero.
    pub messages: u32,
}

impl WaitingView {
    /// Paint the view.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = Screen::Waiting.theme();
        target.clear(theme.background)?;
        label(target, "Waiting...", 10, 20, theme.text)?;
        if let Some(badge) = self.rsa {
            label(target, badge.label(), 10, 60, theme.accent)?;
        }
        label(target, &time_line(self.uptime_s), 10, 100, theme.text)?;
        if self.messages > 0 {
            label(target, &messages_line(self.messages), 10, 140, theme.accent)?;
        }
        Ok(())
    }

    /// Repaint only the uptime row (the 5 s idle refresh).
    pub fn render_time_row<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = Screen::Waiting.theme();
        // Blank the row before redrawing so a shrinking number leaves no tail.
        target.fill_solid(
            &Rectangle::new(Point::new(10, 84), Size::new(300, 24)),
            theme.background,
        )?;
        label(target, &time_line(self.uptime_s), 10, 100, theme.text)
    }
}

/// A peer is connected; prompt for data.
#[derive(Debug, Clone, Copy)]
pub struct ConnectedView {
    /// Decrypt availability badge; `None` on firmware without the feature.
    pub rsa: Option<RsaBadge>,
}

impl ConnectedView {
    /// Paint the view.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = Screen::Connected.theme();
        target.clear(theme.background)?;
        label(target, "Connected!", 10, 20, theme.text)?;
        if self.rsa.is_some() {
            label(target, "Waiting for", 10, 80, theme.text)?;
            label(target, "encrypted data...", 10, 110, theme.text)?;
        }
        if let Some(badge) = self.rsa {
            label(target, badge.ready_label(), 10, 160, theme.accent)?;
        }
        Ok(())
    }
}

/// The most recent inbox message.
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    /// Running message count.
    pub count: u32,
    /// Message body (already rendered to text by the controller).
    pub body: &'a str,
}

impl MessageView<'_> {
    /// Paint the view. The body wraps inside the remaining screen area.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = Screen::Message.theme();
        target.clear(theme.background)?;
        label(target, "Message Received!", 10, 20, theme.text)?;
        label(target, &count_line(self.count), 10, 50, theme.accent)?;
        label(target, "Message:", 10, 90, theme.text)?;

        let body_style = MonoTextStyle::new(&FONT_10X20, theme.text);
        let box_style = TextBoxStyleBuilder::new().build();
        let bounds = Rectangle::new(Point::new(10, 104), Size::new(300, 130));
        TextBox::with_textbox_style(self.body, bounds, body_style, box_style).draw(target)?;
        Ok(())
    }
}

/// Radio initialization failed; terminal screen.
#[derive(Debug, Clone, Copy)]
pub struct FaultView<'a> {
    /// Short failure description.
    pub detail: &'a str,
}

impl FaultView<'_> {
    /// Paint the view.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = Screen::Fault.theme();
        target.clear(theme.background)?;
        label(target, "ERROR", 10, 20, theme.text)?;
        label(target, self.detail, 10, 60, theme.text)
    }
}
