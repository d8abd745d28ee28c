//! Parsed-node model: the untyped tree the parser produces and the writer
//! consumes.

use serde::Serialize;

use crate::value::Value;

/// Kind name of an anonymous `_{ ... }` record.
pub const ANONYMOUS: &str = "_";

/// A node: `Kind { attr = value, ... }`.
///
/// Equality compares kind and attributes in order; source positions are
/// ignored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Node {
    pub kind: String,
    pub attrs: Vec<Attr>,
    #[serde(skip)]
    pub line: usize,
    #[serde(skip)]
    pub column: usize,
}

/// One `name = value` attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Attr {
    pub name: String,
    pub value: Value,
    #[serde(skip)]
    pub line: usize,
    #[serde(skip)]
    pub column: usize,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.attrs == other.attrs
    }
}

impl PartialEq for Attr {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            line: 0,
            column: 0,
        }
    }
}

impl Node {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// An anonymous `_{ ... }` record.
    pub fn record() -> Self {
        Self::new(ANONYMOUS)
    }

    /// Append an attribute (builder). Replaces an existing one of the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind == ANONYMOUS
    }

    /// Whether the kind matches `kind`, ignoring ASCII case.
    pub fn is(&self, kind: &str) -> bool {
        self.kind.eq_ignore_ascii_case(kind)
    }

    /// Attribute value by name (ASCII case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| &a.value)
    }

    /// Replace or append an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(&name)) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr::new(name, value)),
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(index).value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
