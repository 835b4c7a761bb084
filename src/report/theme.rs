//! Shared colors and fonts so the figures look like one set.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const SCATTER_POINT: RGBColor = RGBColor(70, 130, 180); // steel blue
pub const REGRESSION_LINE: RGBColor = RGBColor(0, 0, 139); // dark blue
pub const HISTOGRAM_FILL: RGBColor = RGBColor(135, 206, 235); // sky blue
pub const PRIMARY_BAR: RGBColor = RGBColor(0x3d, 0x66, 0x82);
pub const SECONDARY_BAR: RGBColor = RGBColor(0x44, 0xa7, 0x78);
pub const POSITIVE_BAR: RGBColor = RGBColor(0x2e, 0x8b, 0x57);
pub const NEGATIVE_BAR: RGBColor = RGBColor(0xb2, 0x22, 0x22);

/// Stable per-type accent color.
pub fn type_color(index: usize) -> PaletteColor<Palette99> {
    Palette99::pick(index)
}

pub fn title_font() -> TextStyle<'static> {
    ("sans-serif", 28).into_font().style(FontStyle::Bold).into()
}

pub fn subtitle_font() -> TextStyle<'static> {
    ("sans-serif", 18).into_font().style(FontStyle::Italic).into()
}

pub fn panel_title_font() -> TextStyle<'static> {
    ("sans-serif", 20).into_font().style(FontStyle::Bold).into()
}

pub fn label_font() -> TextStyle<'static> {
    ("sans-serif", 14).into_font().into()
}

/// Label style anchored at its center, for annotations placed on cells.
pub fn centered_label_font() -> TextStyle<'static> {
    label_font().pos(Pos::new(HPos::Center, VPos::Center))
}

/// Title style anchored top-center, for figure headings.
pub fn centered_title_font() -> TextStyle<'static> {
    title_font().pos(Pos::new(HPos::Center, VPos::Top))
}

pub fn centered_subtitle_font() -> TextStyle<'static> {
    subtitle_font().pos(Pos::new(HPos::Center, VPos::Top))
}
