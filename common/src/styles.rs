//! Pre-computed static text styles.
//!
//! Styles are `const` so the renderer never builds them per frame. Only the
//! font and alignment are shared here; draw commands carry their own colors,
//! so the renderer builds `MonoTextStyle::new(font, color)` at draw time.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::{PROFONT_14_POINT, PROFONT_24_POINT};

/// Centered horizontally and vertically on the anchor point.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

/// Title bar and buttons.
pub const TITLE_FONT: &MonoFont = &FONT_10X20;

/// Status line.
pub const STATUS_FONT: &MonoFont = &PROFONT_14_POINT;

/// Heart rate and countdown numbers.
pub const VALUE_FONT: &MonoFont = &PROFONT_24_POINT;
