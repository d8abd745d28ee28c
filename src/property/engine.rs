//! Property engine: set, get, remove and subscribe on session views.
//!
//! Assignments are coerced to the tag's declared kind before they are
//! stored. A change is visible to the renderer (as `set-property`, live
//! views only), to the animation engine, and to listeners subscribed to the
//! tag, in that order. Composite sub-tags (`margin-left`, `border-color`,
//! `translate-x`) read and write their owner and notify under the owner's
//! tag.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, warn};

use super::coerce::{self, apply_route, read_route, Ctx};
use super::registry::{self, PropertyDef};
use crate::animation::{ANIMATION_TAG, PAUSED_TAG};
use crate::dsl::model::Node;
use crate::error::{Error, PropertyError, Result};
use crate::event::handler::Callbacks;
use crate::session::{Mutation, Session};
use crate::value::Value;
use crate::view::ViewId;

/// Tag of the user identifier.
pub const ID_TAG: &str = "id";
/// Tag that applies named styles.
pub const STYLE_TAG: &str = "style";
/// Tag holding a container's children.
pub const CONTENT_TAG: &str = "content";

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A property change delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub view: ViewId,
    /// Owner tag for composite sub-tags.
    pub tag: String,
    pub old: Value,
    pub new: Value,
}

type ListenerFn = dyn FnMut(&mut Session, &PropertyChange) + Send;

/// Identifies one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId {
    view: ViewId,
    tag: String,
    slot: u64,
}

/// Property listeners of one session, keyed by `(view, tag)`.
pub struct ListenerRegistry {
    slots: Callbacks<(ViewId, String), Box<ListenerFn>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            slots: Callbacks::new(),
        }
    }

    pub fn count(&self, view: ViewId, tag: &str) -> usize {
        self.slots.count(&(view, tag.to_owned()))
    }

    pub(crate) fn remove_view(&mut self, view: ViewId) {
        self.slots.retain_keys(|(v, _)| *v != view);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ListenerRegistry(..)")
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Session API
// ---------------------------------------------------------------------------

impl Session {
    /// Assign `value` to `tag` on `view`. Returns whether the effective
    /// value changed. On error the previous value is kept.
    pub fn set(&mut self, view: ViewId, tag: &str, value: impl Into<Value>) -> Result<bool> {
        let tag = normalize(tag);
        let value = value.into();
        self.assign(view, &tag, &value, true).inspect_err(|err| {
            warn!(session = self.id(), ?view, tag = %tag, error = %err, "property assignment rejected");
        })
    }

    /// Assign several properties. Every assignment is attempted; earlier
    /// successes stay in place when a later one fails, and the first error
    /// is returned.
    pub fn set_params<I, K, V>(&mut self, view: ViewId, params: I) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut changed = false;
        let mut first_error = None;
        for (tag, value) in params {
            match self.set(view, tag.as_ref(), value) {
                Ok(c) => changed |= c,
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(changed),
        }
    }

    /// Assign every attribute of a record (`_{ width = 10px, ... }`).
    pub fn set_record(&mut self, view: ViewId, record: &Node) -> Result<bool> {
        self.set_params(view, record.attrs.iter().map(|a| (a.name.as_str(), a.value.clone())))
    }

    /// The effective value of `tag`: the stored value or the tag's default.
    pub fn get(&self, view: ViewId, tag: &str) -> Result<Value> {
        let tag = normalize(tag);
        let data = self.data(view)?;
        match tag.as_str() {
            ID_TAG => return Ok(Value::Str(data.id.clone().unwrap_or_default())),
            CONTENT_TAG if data.container => {
                let children = self
                    .tree
                    .children(view)
                    .iter()
                    .filter_map(|&child| self.describe(child).ok())
                    .map(Value::Node)
                    .collect();
                return Ok(Value::List(children));
            }
            _ => {}
        }
        if let Some(def) = registry::lookup(data.base, &tag) {
            return Ok(self.effective(view, def));
        }
        if let Some(route) = registry::route(&tag) {
            if let Some(def) = registry::lookup(data.base, route.owner()) {
                return Ok(read_route(route, &self.effective(view, def)));
            }
        }
        Err(self.unknown_tag(view, &tag))
    }

    /// Restore the default of `tag`. Returns whether the effective value
    /// changed.
    pub fn remove_property(&mut self, view: ViewId, tag: &str) -> Result<bool> {
        let tag = normalize(tag);
        let data = self.data(view)?;
        let (base, container) = (data.base, data.container);
        match tag.as_str() {
            ID_TAG => return self.assign_id(view, None),
            STYLE_TAG => return Ok(false),
            CONTENT_TAG if container => {
                let children = self.tree.children(view).to_vec();
                for child in &children {
                    self.remove_view(*child)?;
                }
                return Ok(!children.is_empty());
            }
            _ => {}
        }
        if let Some(def) = registry::lookup(base, &tag) {
            return Ok(self.store(view, def, None, true));
        }
        if let Some(route) = registry::route(&tag) {
            if let Some(def) = registry::lookup(base, route.owner()) {
                let current = self.effective(view, def);
                let updated = apply_route(route, &current, None, Ctx::new(&tag, base))?;
                return Ok(self.store(view, def, Some(updated), true));
            }
        }
        Err(self.unknown_tag(view, &tag))
    }

    /// Call `listener` after every change of `tag` on `view`. Sub-tags
    /// subscribe to their owner. A listener added while listeners run
    /// first fires on the next change.
    pub fn subscribe<F>(&mut self, view: ViewId, tag: &str, listener: F) -> Result<ListenerId>
    where
        F: FnMut(&mut Session, &PropertyChange) + Send + 'static,
    {
        let tag = normalize(tag);
        let base = self.data(view)?.base;
        let key = if tag == ID_TAG {
            tag
        } else if let Some(def) = registry::lookup(base, &tag) {
            def.tag.to_owned()
        } else {
            registry::route(&tag)
                .and_then(|route| registry::lookup(base, route.owner()))
                .map(|def| def.tag.to_owned())
                .ok_or_else(|| self.unknown_tag(view, &tag))?
        };
        let slot = self.listeners.slots.add((view, key.clone()), Box::new(listener));
        Ok(ListenerId { view, tag: key, slot })
    }

    pub fn unsubscribe(&mut self, id: &ListenerId) -> bool {
        self.listeners.slots.remove(&(id.view, id.tag.clone()), id.slot)
    }

    /// Record a value the client already shows (a checkbox click, typed
    /// text). Listeners fire; no mutation is sent back.
    pub(crate) fn set_from_client(&mut self, view: ViewId, tag: &str, value: &Value) -> Result<bool> {
        self.assign(view, tag, value, false)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn assign(&mut self, view: ViewId, tag: &str, value: &Value, emit: bool) -> Result<bool> {
        let data = self.data(view)?;
        let base = data.base;
        let container = data.container;
        match tag {
            ID_TAG => {
                let id = match value {
                    Value::Str(s) | Value::Ident(s) => s.clone(),
                    Value::Int(n) => n.to_string(),
                    other => {
                        return Err(PropertyError::mismatch(
                            ID_TAG,
                            format!("expected an identifier, found {}", other.kind_name()),
                        )
                        .into())
                    }
                };
                return self.assign_id(view, (!id.is_empty()).then_some(id));
            }
            STYLE_TAG => return self.apply_style(view, value),
            CONTENT_TAG if container => return self.set_content(view, value),
            _ => {}
        }

        if let Some(def) = registry::lookup(base, tag) {
            let coerced = coerce::coerce(def.kind, value, Ctx::new(tag, base))?;
            return Ok(self.store(view, def, Some(coerced), emit));
        }
        if let Some(route) = registry::route(tag) {
            if let Some(def) = registry::lookup(base, route.owner()) {
                let current = self.effective(view, def);
                let updated = apply_route(route, &current, Some(value), Ctx::new(tag, base))?;
                return Ok(self.store(view, def, Some(updated), emit));
            }
        }
        Err(self.unknown_tag(view, tag))
    }

    fn unknown_tag(&self, view: ViewId, tag: &str) -> Error {
        let kind = self.tree.get(view).map(|d| d.kind.clone()).unwrap_or_default();
        PropertyError::UnknownTag {
            kind,
            tag: tag.to_owned(),
        }
        .into()
    }

    pub(crate) fn effective(&self, view: ViewId, def: &PropertyDef) -> Value {
        self.tree
            .get(view)
            .and_then(|data| data.props.get(def.tag))
            .cloned()
            .unwrap_or_else(|| def.default_value())
    }

    /// Store `new` (or reset to the default when `None`) and propagate the
    /// change. Returns whether the effective value changed.
    fn store(&mut self, view: ViewId, def: &'static PropertyDef, new: Option<Value>, emit: bool) -> bool {
        let old = self.effective(view, def);
        let effective = new.clone().unwrap_or_else(|| def.default_value());
        let Some(data) = self.tree.get_mut(view) else {
            return false;
        };
        match new {
            Some(value) => {
                if old == effective {
                    return false;
                }
                data.props.insert(def.tag.to_owned(), value);
            }
            None => {
                data.props.remove(def.tag);
                if old == effective {
                    return false;
                }
            }
        }
        if emit && data.live {
            self.outbound.push(Mutation::SetProperty {
                view: data.handle,
                tag: def.tag.to_owned(),
                value: effective.clone(),
            });
        }

        match def.tag {
            ANIMATION_TAG => self.replace_animations(view, &effective),
            PAUSED_TAG => self.pause_animations(view, effective.as_bool().unwrap_or(false)),
            _ => {}
        }
        self.notify(PropertyChange {
            view,
            tag: def.tag.to_owned(),
            old,
            new: effective,
        });
        true
    }

    fn assign_id(&mut self, view: ViewId, id: Option<String>) -> Result<bool> {
        let Some(data) = self.tree.get_mut(view) else {
            return Err(Error::ViewNotFound(format!("{view:?}")));
        };
        if data.id == id {
            return Ok(false);
        }
        let old = Value::Str(data.id.take().unwrap_or_default());
        data.id = id;
        let new = Value::Str(data.id.clone().unwrap_or_default());
        if data.live {
            self.outbound.push(Mutation::SetProperty {
                view: data.handle,
                tag: ID_TAG.into(),
                value: new.clone(),
            });
        }
        self.notify(PropertyChange {
            view,
            tag: ID_TAG.into(),
            old,
            new,
        });
        Ok(true)
    }

    /// Copy the flattened attributes of the named styles onto `view`.
    fn apply_style(&mut self, view: ViewId, value: &Value) -> Result<bool> {
        let attrs = self.styles.flatten(value)?;
        self.set_params(view, attrs.into_iter().map(|a| (a.name, a.value)))
    }

    /// Replace the children of a container with views realized from
    /// `value`: a view node, a list of view nodes, or text.
    fn set_content(&mut self, view: ViewId, value: &Value) -> Result<bool> {
        let nodes = content_nodes(value)?;
        let mut diagnostics = Vec::new();
        let children = self.realize_all(&nodes, &mut diagnostics)?;
        for diagnostic in &diagnostics {
            warn!(session = self.id(), ?view, error = %diagnostic, "content property rejected");
        }
        self.replace_children(view, children)?;
        Ok(true)
    }

    fn notify(&mut self, change: PropertyChange) {
        let key = (change.view, change.tag.clone());
        for slot in self.listeners.slots.ids(&key) {
            let Some(mut listener) = self.listeners.slots.take(&key, slot) else {
                continue;
            };
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener(self, &change)));
            self.listeners.slots.restore(&key, slot, listener);
            if result.is_err() {
                error!(session = self.id(), view = ?change.view, tag = %change.tag, "property listener panicked");
            }
        }
    }
}

/// The view nodes a `content` value describes.
pub(crate) fn content_nodes(value: &Value) -> std::result::Result<Vec<Node>, PropertyError> {
    let mismatch = |found: &Value| {
        PropertyError::mismatch(
            CONTENT_TAG,
            format!("expected a view, a list of views or text, found {}", found.kind_name()),
        )
    };
    match value {
        Value::Node(node) if !node.is_anonymous() => Ok(vec![node.clone()]),
        Value::Str(text) => Ok(vec![Node::new("TextView").with("text", text.as_str())]),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Node(node) if !node.is_anonymous() => Ok(node.clone()),
                other => Err(mismatch(other)),
            })
            .collect(),
        other => Err(mismatch(other)),
    }
}
