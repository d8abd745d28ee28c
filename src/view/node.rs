//! View records stored in the arena: `ViewId` and `ViewData`.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use crate::value::Value;

new_key_type! {
    /// Arena key of a view. Copy, lightweight; never reused while the view lives.
    pub struct ViewId;
}

/// Data of a single view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewData {
    /// Kind name as written (built-in or custom, e.g. "GridLayout").
    pub kind: String,
    /// Built-in kind whose tag table applies (equals `kind` for built-ins).
    pub base: &'static str,
    /// Whether the view keeps an ordered child list.
    pub container: bool,
    /// User identifier for lookup (`id = ...`).
    pub id: Option<String>,
    /// Numeric handle the renderer addresses this view by.
    pub handle: u64,
    /// Explicitly assigned properties in canonical form; absent tags read as
    /// their default.
    pub props: BTreeMap<String, Value>,
    /// Whether the renderer has been told about this view (attached under
    /// the session root).
    pub live: bool,
}

impl ViewData {
    /// A view of `kind` with an empty property bag.
    pub fn new(kind: impl Into<String>, base: &'static str, container: bool) -> Self {
        Self {
            kind: kind.into(),
            base,
            container,
            id: None,
            handle: 0,
            props: BTreeMap::new(),
            live: false,
        }
    }

    /// Set the user identifier (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the renderer handle (builder).
    pub fn with_handle(mut self, handle: u64) -> Self {
        self.handle = handle;
        self
    }

    /// Whether the view's identifier equals `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let data = ViewData::new("TextView", "TextView", false);
        assert_eq!(data.kind, "TextView");
        assert!(data.id.is_none());
        assert!(data.props.is_empty());
        assert!(!data.live);
    }

    #[test]
    fn with_id_and_handle() {
        let data = ViewData::new("View", "View", false).with_id("v1").with_handle(7);
        assert!(data.has_id("v1"));
        assert!(!data.has_id("v2"));
        assert_eq!(data.handle, 7);
    }
}
