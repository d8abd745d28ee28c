//! # rui-core
//!
//! The core of a server-driven UI: a view-description language, a typed
//! property engine and a reactive view tree that streams its changes to a
//! remote renderer.
//!
//! A session parses text such as
//! `ListLayout { padding = 8px, content = [ TextView { text = "Hi" } ] }`,
//! realizes it into views, and from then on every property change becomes
//! an outbound mutation record. Renderer events come back in, update the
//! model and run the handlers registered on the target view.
//!
//! ## Core Systems
//!
//! - **[`value`]**: Typed property values: sizes, colors, bounds, borders, animations, ...
//! - **[`dsl`]**: Tokenizer, parser, parsed-node model and canonical writer
//! - **[`property`]**: Tag registry, coercion and the set/get/subscribe engine
//! - **[`view`]**: Slotmap-backed view arena, view factory, realization, lookup
//! - **[`event`]**: Event tags and records, handler adapters, dispatch
//! - **[`animation`]**: Playback bookkeeping for the `animation` property
//! - **[`session`]**: Session, lifecycle, outbound mutations, styles, resources
//! - **[`app`]**: Startup configuration and the async multi-session host
//! - **[`testing`]**: Headless `Pilot` and tree snapshots

// Foundation
pub mod error;
pub mod geometry;
pub mod logging;
pub mod value;

// Language and properties
pub mod dsl;
pub mod property;

// Views and events
pub mod animation;
pub mod event;
pub mod view;

// Runtime
pub mod app;
pub mod session;

// Test support
pub mod testing;

pub use error::{Error, PropertyError, Result};
pub use session::{Mutation, Session};
pub use value::Value;
pub use view::ViewId;
