//! 2D/3D transforms.

use serde::Serialize;

use crate::value::angle::Angle;
use crate::value::size::Size;

/// A transform property bag. Unset fields are `None` and contribute nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Transform {
    pub perspective: Option<Size>,
    pub perspective_origin_x: Option<Size>,
    pub perspective_origin_y: Option<Size>,
    pub origin_x: Option<Size>,
    pub origin_y: Option<Size>,
    pub origin_z: Option<Size>,
    pub translate_x: Option<Size>,
    pub translate_y: Option<Size>,
    pub translate_z: Option<Size>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub scale_z: Option<f64>,
    pub skew_x: Option<Angle>,
    pub skew_y: Option<Angle>,
    pub rotate: Option<Angle>,
    pub rotate_x: Option<f64>,
    pub rotate_y: Option<f64>,
    pub rotate_z: Option<f64>,
    pub backface_visible: Option<bool>,
}

/// Declared type of a transform field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformField {
    Size,
    Scale,
    Angle,
    /// Rotation axis component in `[0, 1]`.
    Axis,
    Flag,
}

impl Transform {
    /// Field names with their declared type, in source order.
    pub const FIELDS: [(&'static str, TransformField); 19] = [
        ("perspective", TransformField::Size),
        ("perspective-origin-x", TransformField::Size),
        ("perspective-origin-y", TransformField::Size),
        ("origin-x", TransformField::Size),
        ("origin-y", TransformField::Size),
        ("origin-z", TransformField::Size),
        ("translate-x", TransformField::Size),
        ("translate-y", TransformField::Size),
        ("translate-z", TransformField::Size),
        ("scale-x", TransformField::Scale),
        ("scale-y", TransformField::Scale),
        ("scale-z", TransformField::Scale),
        ("skew-x", TransformField::Angle),
        ("skew-y", TransformField::Angle),
        ("rotate", TransformField::Angle),
        ("rotate-x", TransformField::Axis),
        ("rotate-y", TransformField::Axis),
        ("rotate-z", TransformField::Axis),
        ("backface-visible", TransformField::Flag),
    ];

    /// Declared type of a field.
    pub fn field_type(name: &str) -> Option<TransformField> {
        Self::FIELDS.iter().find(|(n, _)| *n == name).map(|&(_, t)| t)
    }

    pub fn size_field_mut(&mut self, name: &str) -> Option<&mut Option<Size>> {
        match name {
            "perspective" => Some(&mut self.perspective),
            "perspective-origin-x" => Some(&mut self.perspective_origin_x),
            "perspective-origin-y" => Some(&mut self.perspective_origin_y),
            "origin-x" => Some(&mut self.origin_x),
            "origin-y" => Some(&mut self.origin_y),
            "origin-z" => Some(&mut self.origin_z),
            "translate-x" => Some(&mut self.translate_x),
            "translate-y" => Some(&mut self.translate_y),
            "translate-z" => Some(&mut self.translate_z),
            _ => None,
        }
    }

    /// Scale and rotation-axis fields, both plain numbers.
    pub fn number_field_mut(&mut self, name: &str) -> Option<&mut Option<f64>> {
        match name {
            "scale-x" => Some(&mut self.scale_x),
            "scale-y" => Some(&mut self.scale_y),
            "scale-z" => Some(&mut self.scale_z),
            "rotate-x" => Some(&mut self.rotate_x),
            "rotate-y" => Some(&mut self.rotate_y),
            "rotate-z" => Some(&mut self.rotate_z),
            _ => None,
        }
    }

    pub fn angle_field_mut(&mut self, name: &str) -> Option<&mut Option<Angle>> {
        match name {
            "skew-x" => Some(&mut self.skew_x),
            "skew-y" => Some(&mut self.skew_y),
            "rotate" => Some(&mut self.rotate),
            _ => None,
        }
    }

    /// Whether no field is set.
    pub fn is_identity(&self) -> bool {
        *self == Transform::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_types() {
        assert_eq!(Transform::field_type("translate-x"), Some(TransformField::Size));
        assert_eq!(Transform::field_type("rotate"), Some(TransformField::Angle));
        assert_eq!(Transform::field_type("rotate-z"), Some(TransformField::Axis));
        assert_eq!(Transform::field_type("backface-visible"), Some(TransformField::Flag));
        assert_eq!(Transform::field_type("spin"), None);
    }

    #[test]
    fn field_access_by_name() {
        let mut t = Transform::default();
        assert!(t.is_identity());
        *t.size_field_mut("translate-y").unwrap() = Some(Size::px(10.0));
        *t.number_field_mut("scale-x").unwrap() = Some(2.0);
        *t.angle_field_mut("rotate").unwrap() = Some(Angle::deg(45.0));
        assert_eq!(t.translate_y, Some(Size::px(10.0)));
        assert_eq!(t.scale_x, Some(2.0));
        assert_eq!(t.rotate, Some(Angle::deg(45.0)));
        assert!(!t.is_identity());
    }
}
