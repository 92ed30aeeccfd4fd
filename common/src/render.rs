//! `embedded-graphics` renderer for draw commands.
//!
//! [`Canvas`] wraps any Rgb565 `DrawTarget` and implements [`DisplaySink`],
//! so the firmware hands it the ST7789 and the tests hand it a framebuffer.
//! Draw errors are dropped: a failed SPI write only costs one frame.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, RoundedRectangle};
use embedded_graphics::text::Text;

use crate::colors::BLACK;
use crate::ports::DisplaySink;
use crate::screen::{DrawCommand, ScreenRegion};
use crate::styles::{CENTERED, STATUS_FONT, TITLE_FONT, VALUE_FONT};

/// Corner radius of the touch buttons.
const BUTTON_RADIUS: u32 = 12;

/// Font used for a region's text.
pub const fn region_font(region: ScreenRegion) -> &'static MonoFont<'static> {
    match region {
        ScreenRegion::HeartRate | ScreenRegion::Countdown => VALUE_FONT,
        ScreenRegion::Status => STATUS_FONT,
        ScreenRegion::Title | ScreenRegion::DemoButton | ScreenRegion::SafetyButton => TITLE_FONT,
    }
}

/// Display sink drawing onto an `embedded-graphics` target.
pub struct Canvas<D> {
    target: D,
}

impl<D> Canvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub const fn new(target: D) -> Self { Self { target } }

    pub fn target(&self) -> &D { &self.target }

    pub fn target_mut(&mut self) -> &mut D { &mut self.target }

    pub fn into_inner(self) -> D { self.target }
}

impl<D> DisplaySink for Canvas<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn clear(&mut self) { self.target.clear(BLACK).ok(); }

    fn draw(
        &mut self,
        command: &DrawCommand,
    ) {
        let area = command.area();
        let fill = PrimitiveStyle::with_fill(command.bg);

        match command.region {
            ScreenRegion::DemoButton | ScreenRegion::SafetyButton => {
                // Clear the corners left over from a previous fill
                area.into_styled(PrimitiveStyle::with_fill(BLACK))
                    .draw(&mut self.target)
                    .ok();
                RoundedRectangle::with_equal_corners(area, Size::new(BUTTON_RADIUS, BUTTON_RADIUS))
                    .into_styled(fill)
                    .draw(&mut self.target)
                    .ok();
            }
            _ => {
                area.into_styled(fill).draw(&mut self.target).ok();
            }
        }

        if command.text.is_empty() {
            return;
        }
        let style = MonoTextStyle::new(region_font(command.region), command.fg);
        Text::with_text_style(&command.text, area.center(), style, CENTERED)
            .draw(&mut self.target)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
