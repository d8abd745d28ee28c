//! The tagged [`Value`] variant stored in property bags.
//!
//! Parsed source produces "source-form" values (`Int`, `Ident`, `Str`,
//! `Node`, ...). The property engine coerces them into the canonical variant
//! of the target tag's kind (`Size`, `Color`, `Enum`, `Border`, ...), which is
//! what a read returns.

use serde::Serialize;

use crate::dsl::model::Node;
use crate::value::angle::Angle;
use crate::value::animation::{AnimatedProperty, Animation, Transition};
use crate::value::background::BackgroundElement;
use crate::value::border::Border;
use crate::value::bounds::{Bounds, Range};
use crate::value::clip::ClipShape;
use crate::value::color::Color;
use crate::value::datetime::{Date, TimeOfDay};
use crate::value::filter::ViewFilter;
use crate::value::radius::Radius;
use crate::value::shadow::{Shadow, TextShadow};
use crate::value::size::Size;
use crate::value::transform::Transform;

/// A member of a closed per-property enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EnumValue {
    pub ordinal: usize,
    pub name: &'static str,
}

impl EnumValue {
    /// The member at `ordinal` of `names`.
    pub fn of(names: &'static [&'static str], ordinal: usize) -> Option<Self> {
        names.get(ordinal).map(|&name| EnumValue { ordinal, name })
    }
}

/// Any property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A bare identifier from source text, before coercion.
    Ident(String),
    Size(Size),
    Angle(Angle),
    /// Seconds.
    Duration(f64),
    Color(Color),
    Range(Range),
    Enum(EnumValue),
    Bounds(Bounds),
    Border(Border),
    Radius(Radius),
    Shadow(Shadow),
    TextShadow(TextShadow),
    Background(BackgroundElement),
    Clip(ClipShape),
    Filter(ViewFilter),
    Transform(Transform),
    AnimatedProperty(Box<AnimatedProperty>),
    Animation(Box<Animation>),
    Transition(Transition),
    Date(Date),
    Time(TimeOfDay),
    List(Vec<Value>),
    /// A nested node: a view description, a tagged record such as
    /// `linear-gradient { ... }`, or an anonymous `_{ ... }` record.
    Node(Node),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::Ident(_) => "identifier",
            Value::Size(_) => "size",
            Value::Angle(_) => "angle",
            Value::Duration(_) => "duration",
            Value::Color(_) => "color",
            Value::Range(_) => "range",
            Value::Enum(_) => "enumeration",
            Value::Bounds(_) => "bounds",
            Value::Border(_) => "border",
            Value::Radius(_) => "radius",
            Value::Shadow(_) => "shadow",
            Value::TextShadow(_) => "text shadow",
            Value::Background(_) => "background",
            Value::Clip(_) => "clip",
            Value::Filter(_) => "filter",
            Value::Transform(_) => "transform",
            Value::AnimatedProperty(_) => "animated property",
            Value::Animation(_) => "animation",
            Value::Transition(_) => "transition",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::List(_) => "list",
            Value::Node(_) => "record",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of `Int`, `Float` and `Duration`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) | Value::Duration(f) => Some(*f),
            _ => None,
        }
    }

    /// Text of `Str` and `Ident`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            Value::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_angle(&self) -> Option<Angle> {
        match self {
            Value::Angle(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<Range> {
        match self {
            Value::Range(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Value::Enum(e) => Some(*e),
            _ => None,
        }
    }

    pub fn as_border(&self) -> Option<&Border> {
        match self {
            Value::Border(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_animation(&self) -> Option<&Animation> {
        match self {
            Value::Animation(a) => Some(a),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )+
    };
}

impl_from! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => Str,
    Size => Size,
    Angle => Angle,
    Color => Color,
    Range => Range,
    EnumValue => Enum,
    Bounds => Bounds,
    Border => Border,
    Radius => Radius,
    Shadow => Shadow,
    TextShadow => TextShadow,
    BackgroundElement => Background,
    ClipShape => Clip,
    ViewFilter => Filter,
    Transform => Transform,
    Transition => Transition,
    Date => Date,
    TimeOfDay => Time,
    Vec<Value> => List,
    Node => Node,
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<AnimatedProperty> for Value {
    fn from(v: AnimatedProperty) -> Self {
        Value::AnimatedProperty(Box::new(v))
    }
}

impl From<Animation> for Value {
    fn from(v: Animation) -> Self {
        Value::Animation(Box::new(v))
    }
}
