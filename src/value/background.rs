//! Background layers: images and linear/radial gradients.

use serde::Serialize;

use crate::value::angle::Angle;
use crate::value::color::Color;
use crate::value::size::Size;

/// One color stop; `offset` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }

    /// Stops for `colors` spread evenly over `[0, 1]`.
    pub fn evenly_spaced(colors: &[Color]) -> Vec<GradientStop> {
        match colors.len() {
            0 => Vec::new(),
            1 => vec![GradientStop::new(0.0, colors[0])],
            n => colors
                .iter()
                .enumerate()
                .map(|(i, &c)| GradientStop::new(i as f64 / (n - 1) as f64, c))
                .collect(),
        }
    }
}

named_enum! {
    /// Named end side or corner of a linear gradient.
    pub enum LinearSide {
        ToTop = "to-top",
        ToRightTop = "to-right-top",
        ToRight = "to-right",
        ToRightBottom = "to-right-bottom",
        ToBottom = "to-bottom",
        ToLeftBottom = "to-left-bottom",
        ToLeft = "to-left",
        ToLeftTop = "to-left-top",
    }
}

/// Where a linear gradient runs: from the opposite side/corner to the named
/// one, or along an angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LinearDirection {
    Side(LinearSide),
    Angle(Angle),
}

impl Default for LinearDirection {
    fn default() -> Self {
        LinearDirection::Side(LinearSide::ToBottom)
    }
}

/// A linear gradient.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LinearGradient {
    pub direction: LinearDirection,
    pub stops: Vec<GradientStop>,
    pub repeating: bool,
}

named_enum! {
    /// Shape of a radial gradient.
    pub enum RadialShape {
        Ellipse = "ellipse",
        Circle = "circle",
    }
}

named_enum! {
    /// Keyword extents of a radial gradient.
    pub enum RadialKeyword {
        FarthestCorner = "farthest-corner",
        FarthestSide = "farthest-side",
        ClosestCorner = "closest-corner",
        ClosestSide = "closest-side",
    }
}

/// Radii of a radial gradient: a keyword or explicit X/Y sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RadialExtent {
    Keyword(RadialKeyword),
    Sizes { x: Size, y: Size },
}

impl Default for RadialExtent {
    fn default() -> Self {
        RadialExtent::Keyword(RadialKeyword::FarthestCorner)
    }
}

/// A radial gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialGradient {
    pub shape: RadialShape,
    pub radius: RadialExtent,
    pub center_x: Size,
    pub center_y: Size,
    pub stops: Vec<GradientStop>,
    pub repeating: bool,
}

impl Default for RadialGradient {
    fn default() -> Self {
        Self {
            shape: RadialShape::Ellipse,
            radius: RadialExtent::default(),
            center_x: Size::percent(50.0),
            center_y: Size::percent(50.0),
            stops: Vec::new(),
            repeating: false,
        }
    }
}

named_enum! {
    /// Tiling of a background image.
    pub enum ImageRepeat {
        NoRepeat = "no-repeat",
        Repeat = "repeat",
        RepeatX = "repeat-x",
        RepeatY = "repeat-y",
        Round = "round",
        Space = "space",
    }
}

/// An image layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BackgroundImage {
    pub src: String,
    pub width: Size,
    pub height: Size,
    pub repeat: ImageRepeat,
}

/// One background layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BackgroundElement {
    Image(BackgroundImage),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl BackgroundElement {
    /// The source-text tag of this layer (`image`, `linear-gradient`, `radial-gradient`).
    pub fn tag(&self) -> &'static str {
        match self {
            BackgroundElement::Image(_) => "image",
            BackgroundElement::LinearGradient(_) => "linear-gradient",
            BackgroundElement::RadialGradient(_) => "radial-gradient",
        }
    }

    /// Gradient stops, if this is a gradient layer.
    pub fn stops(&self) -> Option<&[GradientStop]> {
        match self {
            BackgroundElement::Image(_) => None,
            BackgroundElement::LinearGradient(g) => Some(&g.stops),
            BackgroundElement::RadialGradient(g) => Some(&g.stops),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_spacing() {
        let stops = GradientStop::evenly_spaced(&[Color::BLACK, Color::WHITE, Color::BLACK]);
        let offsets: Vec<f64> = stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
        assert_eq!(GradientStop::evenly_spaced(&[Color::WHITE]).len(), 1);
        assert!(GradientStop::evenly_spaced(&[]).is_empty());
    }

    #[test]
    fn element_tags() {
        let linear = BackgroundElement::LinearGradient(LinearGradient::default());
        assert_eq!(linear.tag(), "linear-gradient");
        assert_eq!(linear.stops(), Some(&[][..]));
        let image = BackgroundElement::Image(BackgroundImage::default());
        assert_eq!(image.tag(), "image");
        assert!(image.stops().is_none());
    }

    #[test]
    fn radial_defaults_center() {
        let g = RadialGradient::default();
        assert_eq!(g.center_x, Size::percent(50.0));
        assert_eq!(g.shape, RadialShape::Ellipse);
        assert_eq!(g.radius, RadialExtent::Keyword(RadialKeyword::FarthestCorner));
    }

    #[test]
    fn side_names() {
        assert_eq!(LinearSide::from_name("to-right-top"), Some(LinearSide::ToRightTop));
        assert_eq!(LinearDirection::default(), LinearDirection::Side(LinearSide::ToBottom));
    }
}
