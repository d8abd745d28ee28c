//! Corner radii with independent X and Y sizes.

use serde::Serialize;

use crate::value::size::Size;

/// Horizontal and vertical radius of one corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Corner {
    pub x: Size,
    pub y: Size,
}

impl Corner {
    pub fn circular(size: Size) -> Self {
        Self { x: size, y: size }
    }

    pub fn elliptic(x: Size, y: Size) -> Self {
        Self { x, y }
    }
}

/// Radii of all four corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Radius {
    pub top_left: Corner,
    pub top_right: Corner,
    pub bottom_left: Corner,
    pub bottom_right: Corner,
}

impl Radius {
    /// Corner names, in source order.
    pub const CORNERS: [&'static str; 4] = ["top-left", "top-right", "bottom-left", "bottom-right"];

    /// Same circular radius on every corner.
    pub fn uniform(size: Size) -> Self {
        Self::elliptic(size, size)
    }

    /// Same elliptic radius on every corner.
    pub fn elliptic(x: Size, y: Size) -> Self {
        let corner = Corner::elliptic(x, y);
        Self {
            top_left: corner,
            top_right: corner,
            bottom_left: corner,
            bottom_right: corner,
        }
    }

    pub fn corner(&self, name: &str) -> Option<&Corner> {
        match name {
            "top-left" => Some(&self.top_left),
            "top-right" => Some(&self.top_right),
            "bottom-left" => Some(&self.bottom_left),
            "bottom-right" => Some(&self.bottom_right),
            _ => None,
        }
    }

    pub fn corner_mut(&mut self, name: &str) -> Option<&mut Corner> {
        match name {
            "top-left" => Some(&mut self.top_left),
            "top-right" => Some(&mut self.top_right),
            "bottom-left" => Some(&mut self.bottom_left),
            "bottom-right" => Some(&mut self.bottom_right),
            _ => None,
        }
    }

    pub fn corners_mut(&mut self) -> [&mut Corner; 4] {
        [
            &mut self.top_left,
            &mut self.top_right,
            &mut self.bottom_left,
            &mut self.bottom_right,
        ]
    }

    /// Whether every corner is the same circle.
    pub fn is_uniform(&self) -> bool {
        self.top_left.x == self.top_left.y
            && self.top_left == self.top_right
            && self.top_left == self.bottom_left
            && self.top_left == self.bottom_right
    }
}
