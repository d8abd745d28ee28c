//! Clip regions.

use serde::Serialize;

use crate::value::radius::Radius;
use crate::value::size::Size;

/// The visible region of a view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum ClipShape {
    /// No clipping.
    #[default]
    None,
    Inset {
        top: Size,
        right: Size,
        bottom: Size,
        left: Size,
        radius: Radius,
    },
    Circle {
        x: Size,
        y: Size,
        radius: Size,
    },
    Ellipse {
        x: Size,
        y: Size,
        radius_x: Size,
        radius_y: Size,
    },
    /// Vertices as a flat `x0, y0, x1, y1, ...` list.
    Polygon { points: Vec<Size> },
}

impl ClipShape {
    /// Shape names as written in source (`none` has no record form).
    pub const SHAPES: [&'static str; 4] = ["inset", "circle", "ellipse", "polygon"];

    /// The source-text tag of this shape.
    pub fn tag(&self) -> &'static str {
        match self {
            ClipShape::None => "none",
            ClipShape::Inset { .. } => "inset",
            ClipShape::Circle { .. } => "circle",
            ClipShape::Ellipse { .. } => "ellipse",
            ClipShape::Polygon { .. } => "polygon",
        }
    }

    /// Polygon vertices as `(x, y)` pairs; empty for other shapes.
    pub fn vertices(&self) -> Vec<(Size, Size)> {
        match self {
            ClipShape::Polygon { points } => points.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_vertices() {
        let shape = ClipShape::Polygon {
            points: vec![
                Size::percent(50.0),
                Size::percent(0.0),
                Size::percent(100.0),
                Size::percent(100.0),
                Size::percent(0.0),
                Size::percent(100.0),
            ],
        };
        assert_eq!(shape.tag(), "polygon");
        assert_eq!(shape.vertices().len(), 3);
        assert_eq!(shape.vertices()[0], (Size::percent(50.0), Size::percent(0.0)));
    }

    #[test]
    fn default_is_unclipped() {
        assert_eq!(ClipShape::default(), ClipShape::None);
        assert!(ClipShape::None.vertices().is_empty());
    }
}
