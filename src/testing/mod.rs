//! Headless testing helpers: the [`Pilot`] and tree snapshots.
//!
//! Use the [`Pilot`] to drive a [`Session`](crate::session::Session) without
//! a renderer. Use [`ViewSnapshot`] to compare trees and to render them as
//! an indented outline for snapshot assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::ViewSnapshot;
