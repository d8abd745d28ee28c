//! Event handlers, their argument adapters, and the per-session registry.
//!
//! Every handler is stored in one canonical shape, `(session, view,
//! payload)`. Callers that want fewer arguments register through an
//! adapter which drops the trailing ones:
//!
//! | adapter              | closure receives              |
//! |----------------------|-------------------------------|
//! | [`Handler::new`]     | `(session, view, payload)`    |
//! | [`Handler::view`]    | `(session, view)`             |
//! | [`Handler::payload`] | `(session, payload)`          |
//! | [`Handler::bare`]    | `(session)`                   |
//!
//! `payload` is the only adapter that skips a leading argument: it omits
//! the view receiver and keeps the payload.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::records::EventPayload;
use super::tags::EventTag;
use crate::session::Session;
use crate::view::ViewId;

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

/// Ordered callback lists keyed by `K`.
///
/// A callback is taken out of its slot while it runs and put back
/// afterwards, so it may freely mutate the session that owns the list.
/// Callers snapshot [`ids`](Self::ids) before running, which keeps
/// callbacks added mid-run out of the current round.
pub(crate) struct Callbacks<K, F> {
    next: u64,
    entries: HashMap<K, Vec<(u64, Option<F>)>>,
}

impl<K: Hash + Eq + Clone, F> Callbacks<K, F> {
    pub(crate) fn new() -> Self {
        Self {
            next: 1,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K, callback: F) -> u64 {
        let id = self.next;
        self.next += 1;
        self.entries.entry(key).or_default().push((id, Some(callback)));
        id
    }

    /// Ids registered under `key`, in registration order.
    pub(crate) fn ids(&self, key: &K) -> Vec<u64> {
        self.entries
            .get(key)
            .map(|slots| slots.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    pub(crate) fn take(&mut self, key: &K, id: u64) -> Option<F> {
        self.entries
            .get_mut(key)?
            .iter_mut()
            .find(|(slot, _)| *slot == id)?
            .1
            .take()
    }

    /// Put a taken callback back. Dropped if it was removed meanwhile.
    pub(crate) fn restore(&mut self, key: &K, id: u64, callback: F) {
        if let Some(slot) = self
            .entries
            .get_mut(key)
            .and_then(|slots| slots.iter_mut().find(|(slot, _)| *slot == id))
        {
            slot.1 = Some(callback);
        }
    }

    pub(crate) fn remove(&mut self, key: &K, id: u64) -> bool {
        let Some(slots) = self.entries.get_mut(key) else {
            return false;
        };
        let before = slots.len();
        slots.retain(|(slot, _)| *slot != id);
        let removed = slots.len() != before;
        if slots.is_empty() {
            self.entries.remove(key);
        }
        removed
    }

    pub(crate) fn retain_keys(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    pub(crate) fn count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, Vec::len)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

type HandlerFn = dyn FnMut(&mut Session, ViewId, &EventPayload) + Send;

/// A boxed event handler in canonical form.
pub struct Handler {
    call: Box<HandlerFn>,
}

impl Handler {
    /// Handler taking the full `(session, view, payload)` tuple.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&mut Session, ViewId, &EventPayload) + Send + 'static,
    {
        Self { call: Box::new(f) }
    }

    /// Handler that ignores the payload.
    pub fn view<F>(mut f: F) -> Self
    where
        F: FnMut(&mut Session, ViewId) + Send + 'static,
    {
        Self::new(move |session, view, _| f(session, view))
    }

    /// Handler without the view receiver.
    pub fn payload<F>(mut f: F) -> Self
    where
        F: FnMut(&mut Session, &EventPayload) + Send + 'static,
    {
        Self::new(move |session, _, payload| f(session, payload))
    }

    /// Handler that only needs the session.
    pub fn bare<F>(mut f: F) -> Self
    where
        F: FnMut(&mut Session) + Send + 'static,
    {
        Self::new(move |session, _, _| f(session))
    }

    pub(crate) fn call(&mut self, session: &mut Session, view: ViewId, payload: &EventPayload) {
        (self.call)(session, view, payload)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

/// Identifies one registration, for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId {
    pub(crate) view: ViewId,
    pub(crate) tag: EventTag,
    pub(crate) slot: u64,
}

/// Handlers of one session, keyed by `(view, tag)`.
pub struct HandlerRegistry {
    slots: Callbacks<(ViewId, EventTag), Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            slots: Callbacks::new(),
        }
    }

    /// Append a handler; it runs after those already registered.
    pub fn add(&mut self, view: ViewId, tag: EventTag, handler: Handler) -> HandlerId {
        let slot = self.slots.add((view, tag), handler);
        HandlerId { view, tag, slot }
    }

    pub fn remove(&mut self, id: HandlerId) -> bool {
        self.slots.remove(&(id.view, id.tag), id.slot)
    }

    /// Number of handlers registered for `(view, tag)`.
    pub fn count(&self, view: ViewId, tag: EventTag) -> usize {
        self.slots.count(&(view, tag))
    }

    /// Drop every handler of `view`.
    pub fn remove_view(&mut self, view: ViewId) {
        self.slots.retain_keys(|(v, _)| *v != view);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn ids(&self, view: ViewId, tag: EventTag) -> Vec<u64> {
        self.slots.ids(&(view, tag))
    }

    pub(crate) fn take(&mut self, view: ViewId, tag: EventTag, slot: u64) -> Option<Handler> {
        self.slots.take(&(view, tag), slot)
    }

    pub(crate) fn restore(&mut self, view: ViewId, tag: EventTag, slot: u64, handler: Handler) {
        self.slots.restore(&(view, tag), slot, handler)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
