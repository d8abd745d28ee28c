//! Box shadows and text shadows.

use serde::Serialize;

use crate::value::color::Color;
use crate::value::size::Size;

/// A box shadow.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Shadow {
    pub x_offset: Size,
    pub y_offset: Size,
    pub blur: Size,
    pub spread_radius: Size,
    pub color: Color,
    pub inset: bool,
}

impl Shadow {
    pub const FIELDS: [&'static str; 6] =
        ["x-offset", "y-offset", "blur", "spread-radius", "color", "inset"];

    pub fn new(x_offset: Size, y_offset: Size, blur: Size, color: Color) -> Self {
        Self {
            x_offset,
            y_offset,
            blur,
            spread_radius: Size::px(0.0),
            color,
            inset: false,
        }
    }

    pub fn with_spread(mut self, spread_radius: Size) -> Self {
        self.spread_radius = spread_radius;
        self
    }

    pub fn inset(mut self) -> Self {
        self.inset = true;
        self
    }
}

/// A text shadow (no spread, never inset). Also the payload of a
/// `drop-shadow` filter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextShadow {
    pub x_offset: Size,
    pub y_offset: Size,
    pub blur: Size,
    pub color: Color,
}

impl TextShadow {
    pub const FIELDS: [&'static str; 4] = ["x-offset", "y-offset", "blur", "color"];

    pub fn new(x_offset: Size, y_offset: Size, blur: Size, color: Color) -> Self {
        Self {
            x_offset,
            y_offset,
            blur,
            color,
        }
    }
}
