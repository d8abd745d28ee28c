//! Named styles: reusable attribute sets applied with `style = name`.
//!
//! A style may inherit from other styles through its own `style`
//! attribute. Applying a style copies its flattened attributes (bases
//! first) onto the view; later edits to the style do not reach views
//! already styled with it.

use std::collections::HashMap;

use crate::dsl::model::{Attr, Node};
use crate::dsl::parser;
use crate::error::{Error, PropertyError, Result};
use crate::value::Value;

/// Kind of the node that holds style definitions in source text.
pub const STYLES_KIND: &str = "Styles";

/// The named styles of one session.
#[derive(Debug, Clone, Default)]
pub struct StyleSet {
    styles: HashMap<String, Node>,
}

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or replace) a style from a record of attributes.
    pub fn define(&mut self, name: impl Into<String>, attrs: Node) {
        self.styles.insert(name.into(), attrs);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.styles.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.styles.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Load definitions from `Styles { name = _{ ... }, ... }` text.
    /// Returns the number of styles defined.
    pub fn load(&mut self, source: &str) -> Result<usize> {
        let node = parser::parse(source)?;
        if !node.kind.eq_ignore_ascii_case(STYLES_KIND) {
            return Err(Error::UnknownKind(node.kind));
        }
        let mut count = 0;
        for attr in node.attrs {
            match attr.value {
                Value::Node(record) => {
                    self.define(attr.name, record);
                    count += 1;
                }
                other => {
                    return Err(PropertyError::mismatch(
                        attr.name,
                        format!("expected a style record, found {}", other.kind_name()),
                    )
                    .into())
                }
            }
        }
        Ok(count)
    }

    /// Attributes of `value` (one style name or a list of names), bases
    /// first. A cycle or an unknown name is a type mismatch on `style`.
    pub fn flatten(&self, value: &Value) -> std::result::Result<Vec<Attr>, PropertyError> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        for name in style_names(value)? {
            self.flatten_into(&name, &mut stack, &mut out)?;
        }
        Ok(out)
    }

    fn flatten_into(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        out: &mut Vec<Attr>,
    ) -> std::result::Result<(), PropertyError> {
        if stack.iter().any(|s| s == name) {
            return Err(PropertyError::mismatch(
                "style",
                format!("style cycle: {} -> {name}", stack.join(" -> ")),
            ));
        }
        let style = self
            .styles
            .get(name)
            .ok_or_else(|| PropertyError::mismatch("style", format!("unknown style `{name}`")))?;

        stack.push(name.to_owned());
        if let Some(bases) = style.get("style") {
            for base in style_names(bases)? {
                self.flatten_into(&base, stack, out)?;
            }
        }
        stack.pop();

        out.extend(style.attrs.iter().filter(|a| a.name != "style").cloned());
        Ok(())
    }
}

fn style_names(value: &Value) -> std::result::Result<Vec<String>, PropertyError> {
    match value {
        Value::Str(s) | Value::Ident(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()),
        Value::List(items) => items.iter().try_fold(Vec::new(), |mut acc, item| {
            acc.extend(style_names(item)?);
            Ok(acc)
        }),
        other => Err(PropertyError::mismatch(
            "style",
            format!("expected a style name, found {}", other.kind_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Size;
    use pretty_assertions::assert_eq;

    fn names(attrs: &[Attr]) -> Vec<&str> {
        attrs.iter().map(|a| a.name.as_str()).collect()
    }

    // ── Definition ───────────────────────────────────────────────────

    #[test]
    fn load_from_source() {
        let mut styles = StyleSet::new();
        let n = styles
            .load("Styles { card = _{ padding = 8px, radius = 4px }, title = _{ text-size = 2em } }")
            .unwrap();
        assert_eq!(n, 2);
        assert!(styles.contains("card"));
        assert_eq!(styles.get("card").unwrap().get("padding"), Some(&Value::Size(Size::px(8.0))));
    }

    #[test]
    fn load_rejects_other_kinds() {
        let mut styles = StyleSet::new();
        assert!(matches!(styles.load("View { }"), Err(Error::UnknownKind(_))));
        assert!(styles.load("Styles { card = 3 }").is_err());
    }

    // ── Flattening ───────────────────────────────────────────────────

    #[test]
    fn bases_come_first() {
        let mut styles = StyleSet::new();
        styles.define("base", Node::record().with("width", 10).with("height", 10));
        styles.define(
            "derived",
            Node::record().with("style", Value::Ident("base".into())).with("width", 20),
        );
        let attrs = styles.flatten(&Value::Ident("derived".into())).unwrap();
        assert_eq!(names(&attrs), vec!["width", "height", "width"]);
        assert_eq!(attrs[2].value, Value::Int(20));
    }

    #[test]
    fn list_of_names() {
        let mut styles = StyleSet::new();
        styles.define("a", Node::record().with("width", 1));
        styles.define("b", Node::record().with("height", 2));
        let attrs = styles.flatten(&Value::Str("a, b".into())).unwrap();
        assert_eq!(names(&attrs), vec!["width", "height"]);
    }

    #[test]
    fn cycle_is_a_mismatch_on_style() {
        let mut styles = StyleSet::new();
        styles.define("a", Node::record().with("style", Value::Ident("b".into())));
        styles.define("b", Node::record().with("style", Value::Ident("a".into())));
        let err = styles.flatten(&Value::Ident("a".into())).unwrap_err();
        assert_eq!(err.tag(), "style");
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn unknown_style() {
        let styles = StyleSet::new();
        let err = styles.flatten(&Value::Ident("ghost".into())).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let mut styles = StyleSet::new();
        styles.define("root", Node::record().with("width", 1));
        styles.define("left", Node::record().with("style", Value::Ident("root".into())));
        styles.define("right", Node::record().with("style", Value::Ident("root".into())));
        let both = Value::List(vec![Value::Ident("left".into()), Value::Ident("right".into())]);
        assert_eq!(styles.flatten(&both).unwrap().len(), 2);
    }
}
