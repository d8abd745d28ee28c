//! The view tree: arena, factory, realization from parsed nodes and
//! identifier lookup.

pub mod factory;
pub mod node;
pub mod query;
pub mod realize;
pub mod tree;

pub use factory::{builtin, CustomKind, KindInfo, ViewFactory, BUILTIN_KINDS};
pub use node::{ViewData, ViewId};
pub use query::view_by_id;
pub use realize::Realized;
pub use tree::ViewTree;
