//! Value kinds: the closed set of types a property may hold.
//!
//! Scalars (size, angle, color, range, date/time), composite records
//! (border, radius, shadow, background, clip, filter, transform, animation)
//! and the tagged [`Value`] variant that carries any of them.

/// Declares a closed enumeration whose variants have canonical lowercase
/// names, addressable by ordinal or by name.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Canonical names, indexed by ordinal.
            pub const NAMES: &'static [&'static str] = &[$($text),+];

            const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn name(self) -> &'static str {
                Self::NAMES[self as usize]
            }

            pub fn ordinal(self) -> usize {
                self as usize
            }

            pub fn from_ordinal(ordinal: usize) -> Option<Self> {
                Self::ALL.get(ordinal).copied()
            }

            /// Case-insensitive name lookup.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::NAMES
                    .iter()
                    .position(|n| n.eq_ignore_ascii_case(name))
                    .and_then(Self::from_ordinal)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }
    };
}

pub mod angle;
pub mod animation;
pub mod background;
pub mod border;
pub mod bounds;
pub mod clip;
pub mod color;
pub mod datetime;
pub mod filter;
pub mod radius;
pub mod shadow;
pub mod size;
pub mod tagged;
pub mod transform;

pub use angle::{Angle, AngleUnit};
pub use animation::{
    AnimatedProperty, Animation, AnimationDirection, StepJump, TimingFunction, Transition, INFINITE,
};
pub use background::{
    BackgroundElement, BackgroundImage, GradientStop, ImageRepeat, LinearDirection, LinearGradient,
    LinearSide, RadialExtent, RadialGradient, RadialKeyword, RadialShape,
};
pub use border::{Border, BorderEdge, BorderStyle};
pub use bounds::{Bounds, Range};
pub use clip::ClipShape;
pub use color::Color;
pub use datetime::{Date, TimeOfDay};
pub use filter::ViewFilter;
pub use radius::{Corner, Radius};
pub use shadow::{Shadow, TextShadow};
pub use size::{Size, SizeUnit};
pub use tagged::{EnumValue, Value};
pub use transform::{Transform, TransformField};
