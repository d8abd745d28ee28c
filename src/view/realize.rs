//! Realization: build detached views from parsed nodes, and describe views
//! back as nodes.
//!
//! A node's attributes are applied in a fixed order: the custom kind's
//! defaults, then `style`, then `id`, then the remaining attributes in
//! source order, then `content`. Property failures are collected as
//! diagnostics and the view keeps its previous value. Parse errors, unknown
//! kinds and tree failures abort, and the partially built subtree is
//! removed.

use tracing::{debug, warn};

use super::node::ViewId;
use crate::dsl::model::{Attr, Node};
use crate::error::{Error, PropertyError, Result};
use crate::property::engine::{content_nodes, CONTENT_TAG, ID_TAG, STYLE_TAG};
use crate::session::Session;
use crate::value::Value;

/// Outcome of a realization.
#[derive(Debug)]
pub struct Realized {
    /// Top view of the new subtree; detached.
    pub root: ViewId,
    /// Rejected assignments, in application order.
    pub diagnostics: Vec<PropertyError>,
}

impl Realized {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Session {
    /// Build a detached subtree from `node`.
    pub fn realize(&mut self, node: &Node) -> Result<Realized> {
        let mut diagnostics = Vec::new();
        let root = self.realize_node(node, &mut diagnostics)?;
        debug!(
            session = self.id(),
            kind = %node.kind,
            diagnostics = diagnostics.len(),
            "view realized"
        );
        Ok(Realized { root, diagnostics })
    }

    /// Parse `source` and realize the single top-level node.
    pub fn realize_source(&mut self, source: &str) -> Result<Realized> {
        let node = crate::dsl::parse(source)?;
        self.realize(&node)
    }

    fn realize_node(&mut self, node: &Node, diagnostics: &mut Vec<PropertyError>) -> Result<ViewId> {
        let (view, defaults) = self.create_bare(&node.kind)?;
        match self.populate(view, node, defaults.as_ref(), diagnostics) {
            Ok(()) => Ok(view),
            Err(err) => {
                if let Err(cleanup) = self.remove_view(view) {
                    warn!(session = self.id(), error = %cleanup, "partial view cleanup failed");
                }
                Err(err)
            }
        }
    }

    fn populate(
        &mut self,
        view: ViewId,
        node: &Node,
        defaults: Option<&Node>,
        diagnostics: &mut Vec<PropertyError>,
    ) -> Result<()> {
        let rest = node.attrs.iter().filter(|a| {
            ![STYLE_TAG, ID_TAG, CONTENT_TAG]
                .iter()
                .any(|tag| a.name.eq_ignore_ascii_case(tag))
        });

        let ordered: Vec<&Attr> = defaults
            .into_iter()
            .flat_map(|d| d.attrs.iter())
            .chain(named(node, STYLE_TAG))
            .chain(named(node, ID_TAG))
            .chain(rest)
            .collect();
        for attr in ordered {
            if attr.name.eq_ignore_ascii_case(CONTENT_TAG) {
                self.realize_content(view, &attr.value, diagnostics)?;
            } else {
                collect(self.set(view, &attr.name, attr.value.clone()), diagnostics)?;
            }
        }
        for attr in named(node, CONTENT_TAG) {
            self.realize_content(view, &attr.value, diagnostics)?;
        }
        Ok(())
    }

    /// Children of a container come from `content`; on a leaf `content` is
    /// an ordinary property assignment.
    fn realize_content(
        &mut self,
        view: ViewId,
        value: &Value,
        diagnostics: &mut Vec<PropertyError>,
    ) -> Result<()> {
        if !self.data(view)?.container {
            return collect(self.set(view, CONTENT_TAG, value.clone()), diagnostics);
        }
        let nodes = match content_nodes(value) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(session = self.id(), ?view, error = %err, "content rejected");
                diagnostics.push(err);
                return Ok(());
            }
        };
        let children = self.realize_all(&nodes, diagnostics)?;
        self.replace_children(view, children)
    }

    /// Realize every node as a detached subtree. If one fails, the subtrees
    /// already built are removed and the error is returned.
    pub(crate) fn realize_all(
        &mut self,
        nodes: &[Node],
        diagnostics: &mut Vec<PropertyError>,
    ) -> Result<Vec<ViewId>> {
        let mut built = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.realize_node(node, diagnostics) {
                Ok(view) => built.push(view),
                Err(err) => {
                    for view in built {
                        if let Err(cleanup) = self.remove_view(view) {
                            warn!(session = self.id(), error = %cleanup, "partial content cleanup failed");
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(built)
    }

    /// Swap the children of `view` for the detached `children`.
    pub(crate) fn replace_children(&mut self, view: ViewId, children: Vec<ViewId>) -> Result<()> {
        for child in self.tree.children(view).to_vec() {
            self.remove_view(child)?;
        }
        for child in children {
            self.append_view(view, child)?;
        }
        Ok(())
    }

    /// Describe `view` and its subtree as a node that realizes to an equal
    /// tree.
    pub fn describe(&self, view: ViewId) -> Result<Node> {
        let data = self.data(view)?;
        let mut node = Node::new(data.kind.clone());
        if let Some(id) = &data.id {
            node.attrs.push(Attr::new(ID_TAG, id.as_str()));
        }
        node.attrs.extend(
            data.props
                .iter()
                .map(|(tag, value)| Attr::new(tag.as_str(), value.clone())),
        );
        let children = self.tree.children(view);
        if data.container && !children.is_empty() {
            let content = children
                .iter()
                .map(|&child| self.describe(child).map(Value::Node))
                .collect::<Result<Vec<_>>>()?;
            node.attrs.push(Attr::new(CONTENT_TAG, Value::List(content)));
        }
        Ok(node)
    }
}

fn named<'a>(node: &'a Node, name: &'static str) -> impl Iterator<Item = &'a Attr> + 'a {
    node.attrs.iter().filter(move |a| a.name.eq_ignore_ascii_case(name))
}

/// Move a property failure into `diagnostics`; anything else is fatal.
fn collect(result: Result<bool>, diagnostics: &mut Vec<PropertyError>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(Error::Property(err)) => {
            diagnostics.push(err);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Color, Size};
    use crate::view::ViewFactory;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    // ── Realize ──────────────────────────────────────────────────────

    #[test]
    fn nested_content_becomes_children() {
        let mut s = Session::new(1);
        let realized = s
            .realize_source("ListLayout { content = [ View { id = a }, TextView { text = hi } ] }")
            .unwrap();
        assert!(realized.is_clean());
        let kids = s.tree().children(realized.root).to_vec();
        assert_eq!(kids.len(), 2);
        assert_eq!(s.view(kids[0]).unwrap().id.as_deref(), Some("a"));
        assert_eq!(s.view(kids[1]).unwrap().kind, "TextView");
        assert!(!s.view(realized.root).unwrap().live);
    }

    #[test]
    fn property_errors_are_diagnostics() {
        let mut s = Session::new(1);
        let realized = s.realize_source("View { width = notAColor, height = 5px }").unwrap();
        assert_eq!(realized.diagnostics.len(), 1);
        assert_eq!(realized.diagnostics[0].tag(), "width");
        assert!(s.get(realized.root, "width").unwrap().as_size().unwrap().is_auto());
        assert_eq!(s.get(realized.root, "height").unwrap(), Value::Size(Size::px(5.0)));
    }

    #[test]
    fn unknown_kind_aborts_and_cleans_up() {
        let mut s = Session::new(1);
        let err = s
            .realize_source("ListLayout { content = [ View { }, Bogus { } ] }")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKind(ref k) if k == "Bogus"));
        assert!(s.tree().is_empty());
    }

    #[test]
    fn parse_error_is_fatal() {
        let mut s = Session::new(1);
        assert!(matches!(s.realize_source("View { width = }"), Err(Error::Parse(_))));
    }

    #[test]
    fn own_attributes_override_style_and_defaults() {
        let mut factory = ViewFactory::new();
        factory
            .register_source("Banner", "TextView { text-color = #FF0000FF, text = default }")
            .unwrap();
        let mut s = Session::new(1).with_factory(Arc::new(factory));
        s.styles_mut()
            .define("loud", Node::record().with("text", "styled").with("opacity", 0.5));
        let realized = s
            .realize_source("Banner { text = own, style = loud }")
            .unwrap();
        let v = realized.root;
        assert_eq!(s.get(v, "text").unwrap(), Value::Str("own".into()));
        assert_eq!(s.get(v, "opacity").unwrap(), Value::Float(0.5));
        assert_eq!(s.get(v, "text-color").unwrap(), Value::Color(Color(0xFF00_00FF)));
    }

    #[test]
    fn bad_content_value_is_a_diagnostic() {
        let mut s = Session::new(1);
        let realized = s.realize_source("ListLayout { content = 5 }").unwrap();
        assert_eq!(realized.diagnostics[0].tag(), "content");
        assert!(s.tree().children(realized.root).is_empty());
    }

    // ── Describe ─────────────────────────────────────────────────────

    #[test]
    fn describe_round_trips() {
        let mut s = Session::new(1);
        let first = s
            .realize_source("ListLayout { id = top, padding = 4px, content = [ TextView { text = \"a b\" } ] }")
            .unwrap();
        let described = s.describe(first.root).unwrap();
        let second = s.realize(&described).unwrap();
        assert!(second.is_clean());
        assert_eq!(s.describe(second.root).unwrap(), described);
    }
}
