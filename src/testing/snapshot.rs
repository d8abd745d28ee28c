//! Tree snapshots.
//!
//! A [`ViewSnapshot`] is a plain, comparable copy of a view subtree: kind,
//! identifier, explicitly assigned properties and children. Handles and
//! arena keys are left out, so two independently realized trees compare
//! equal when they describe the same UI.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::dsl::write_value;
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;
use crate::view::ViewId;

/// A detached copy of a view subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub props: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewSnapshot>,
}

impl ViewSnapshot {
    /// Number of views in the snapshot.
    pub fn view_count(&self) -> usize {
        1 + self.children.iter().map(ViewSnapshot::view_count).sum::<usize>()
    }

    /// One line per view, indented by depth:
    ///
    /// ```text
    /// ListLayout opacity=0.5
    ///   TextView #title text="Hello"
    /// ```
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_into(0, &mut out);
        out
    }

    fn outline_into(&self, depth: usize, out: &mut String) {
        if depth > 0 {
            out.push('\n');
        }
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.kind);
        if let Some(id) = &self.id {
            let _ = write!(out, " #{id}");
        }
        for (tag, value) in &self.props {
            let _ = write!(out, " {tag}={}", write_value(value));
        }
        for child in &self.children {
            child.outline_into(depth + 1, out);
        }
    }
}

impl Session {
    /// Snapshot `view` and its subtree.
    pub fn snapshot(&self, view: ViewId) -> Result<ViewSnapshot> {
        let data = self.data(view)?;
        let children = self
            .tree
            .children(view)
            .iter()
            .map(|&child| self.snapshot(child))
            .collect::<Result<Vec<_>>>()?;
        Ok(ViewSnapshot {
            kind: data.kind.clone(),
            id: data.id.clone(),
            props: data.props.clone(),
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Snapshot ─────────────────────────────────────────────────────

    #[test]
    fn snapshot_ignores_handles() {
        let mut s = Session::new(1);
        let source = "ListLayout { content = [ TextView { id = t, text = hi } ] }";
        let a = s.realize_source(source).unwrap().root;
        let b = s.realize_source(source).unwrap().root;
        assert_ne!(s.view(a).unwrap().handle, s.view(b).unwrap().handle);
        assert_eq!(s.snapshot(a).unwrap(), s.snapshot(b).unwrap());
        assert_eq!(s.snapshot(a).unwrap().view_count(), 2);
    }

    // ── Outline ──────────────────────────────────────────────────────

    #[test]
    fn outline_lists_views_by_depth() {
        let mut s = Session::new(1);
        let root = s
            .realize_source(
                "ListLayout { opacity = 0.5, content = [ TextView { id = title, text = \"Hello\" }, View { } ] }",
            )
            .unwrap()
            .root;
        insta::assert_snapshot!(s.snapshot(root).unwrap().outline(), @r#"
        ListLayout opacity=0.5
          TextView #title text="Hello"
          View
        "#);
    }
}
