//! Typed properties: the tag registry, value coercion and the engine that
//! stores values on views and reports changes.

pub mod coerce;
pub mod engine;
pub mod registry;

pub use coerce::{coerce, Ctx};
pub use engine::{ListenerId, ListenerRegistry, PropertyChange, CONTENT_TAG, ID_TAG, STYLE_TAG};
pub use registry::{lookup, route, tags, value_kind, PropertyDef, PropertyKind, Route};
