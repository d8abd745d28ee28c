//! Sessions: the per-client runtime and its lifecycle, outbound mutation
//! stream, named styles and resource loads.

pub mod lifecycle;
pub mod mutation;
pub mod resources;
pub mod runtime;
pub mod styles;

pub use lifecycle::{LifecycleEvent, Phase, SessionListener};
pub use mutation::Mutation;
pub use resources::{LoadId, Resource, ResourceLocator, ResourceRegistry};
pub use runtime::{ClientInfo, Session};
pub use styles::StyleSet;
