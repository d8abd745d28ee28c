//! Per-edge borders.

use serde::Serialize;

use crate::value::color::Color;
use crate::value::size::Size;

named_enum! {
    /// Line style of a border edge.
    pub enum BorderStyle {
        None = "none",
        Solid = "solid",
        Dashed = "dashed",
        Dotted = "dotted",
        Double = "double",
    }
}

/// Style, width and color of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderEdge {
    pub style: BorderStyle,
    pub width: Size,
    pub color: Color,
}

impl BorderEdge {
    pub const FIELDS: [&'static str; 3] = ["style", "width", "color"];

    pub fn new(style: BorderStyle, width: Size, color: Color) -> Self {
        Self {
            style,
            width,
            color,
        }
    }
}

/// Four border edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Border {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
}

impl Border {
    /// Edge names, in source order.
    pub const EDGES: [&'static str; 4] = ["left", "right", "top", "bottom"];

    /// One edge description applied to all four edges.
    pub fn uniform(edge: BorderEdge) -> Self {
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
        }
    }

    /// Whether all four edges are identical.
    pub fn is_uniform(&self) -> bool {
        self.left == self.right && self.left == self.top && self.left == self.bottom
    }

    pub fn edge(&self, name: &str) -> Option<&BorderEdge> {
        match name {
            "left" => Some(&self.left),
            "right" => Some(&self.right),
            "top" => Some(&self.top),
            "bottom" => Some(&self.bottom),
            _ => None,
        }
    }

    pub fn edge_mut(&mut self, name: &str) -> Option<&mut BorderEdge> {
        match name {
            "left" => Some(&mut self.left),
            "right" => Some(&mut self.right),
            "top" => Some(&mut self.top),
            "bottom" => Some(&mut self.bottom),
            _ => None,
        }
    }

    /// Mutable references to every edge.
    pub fn edges_mut(&mut self) -> [&mut BorderEdge; 4] {
        [&mut self.left, &mut self.right, &mut self.top, &mut self.bottom]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_names() {
        assert_eq!(BorderStyle::Solid.name(), "solid");
        assert_eq!(BorderStyle::from_name("DOTTED"), Some(BorderStyle::Dotted));
        assert_eq!(BorderStyle::from_name("wavy"), None);
        assert_eq!(BorderStyle::from_ordinal(4), Some(BorderStyle::Double));
        assert_eq!(BorderStyle::from_ordinal(5), None);
        assert_eq!(BorderStyle::default(), BorderStyle::None);
    }

    #[test]
    fn uniform_border() {
        let edge = BorderEdge::new(BorderStyle::Solid, Size::px(1.0), Color(0xFF808080));
        let mut border = Border::uniform(edge);
        assert!(border.is_uniform());
        border.edge_mut("top").unwrap().style = BorderStyle::Dashed;
        assert!(!border.is_uniform());
        assert_eq!(border.edge("top").unwrap().style, BorderStyle::Dashed);
        assert_eq!(border.edge("left").unwrap().style, BorderStyle::Solid);
    }

    #[test]
    fn default_is_no_border() {
        let border = Border::default();
        assert!(border.is_uniform());
        assert_eq!(border.left.style, BorderStyle::None);
        assert!(border.left.width.is_auto());
    }

    #[test]
    fn style_serializes_by_name() {
        assert_eq!(serde_json::to_string(&BorderStyle::Dashed).unwrap(), "\"dashed\"");
    }
}
