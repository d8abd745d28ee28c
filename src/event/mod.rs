//! Event system: tags, payload records, handlers and dispatch.

pub mod dispatch;
pub mod handler;
pub mod records;
pub mod tags;

pub use handler::{Handler, HandlerId, HandlerRegistry};
pub use records::{
    EventPayload, EventTarget, FileInfo, InboundEvent, KeyEvent, Modifiers, MouseEvent, PlayerError,
    PointerEvent, Touch, TouchEvent,
};
pub use tags::{Category, EventTag, PayloadShape};
