//! Outbound mutation records: what the renderer must apply to stay in sync.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::value::{Animation, Value};

/// One change to the rendered tree. Views are addressed by their renderer
/// handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Mutation {
    SetProperty {
        view: u64,
        tag: String,
        value: Value,
    },
    /// `parent` is `None` for the session root.
    CreateView {
        view: u64,
        parent: Option<u64>,
        position: usize,
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        props: BTreeMap<String, Value>,
    },
    RemoveView {
        view: u64,
    },
    MoveView {
        view: u64,
        parent: u64,
        position: usize,
    },
    BeginAnimation {
        view: u64,
        tag: String,
        animation: Animation,
    },
    CancelAnimation {
        view: u64,
        tag: String,
        id: String,
    },
}

impl Mutation {
    /// Handle of the view the mutation applies to.
    pub fn view(&self) -> u64 {
        match self {
            Mutation::SetProperty { view, .. }
            | Mutation::CreateView { view, .. }
            | Mutation::RemoveView { view }
            | Mutation::MoveView { view, .. }
            | Mutation::BeginAnimation { view, .. }
            | Mutation::CancelAnimation { view, .. } => *view,
        }
    }

    /// Wire name of the operation.
    pub fn op(&self) -> &'static str {
        match self {
            Mutation::SetProperty { .. } => "set-property",
            Mutation::CreateView { .. } => "create-view",
            Mutation::RemoveView { .. } => "remove-view",
            Mutation::MoveView { .. } => "move-view",
            Mutation::BeginAnimation { .. } => "begin-animation",
            Mutation::CancelAnimation { .. } => "cancel-animation",
        }
    }

    /// JSON encoding for the transport.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Size;

    #[test]
    fn op_names_match_wire_tag() {
        let m = Mutation::RemoveView { view: 4 };
        assert_eq!(m.op(), "remove-view");
        assert_eq!(m.view(), 4);
        let json: serde_json::Value = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        assert_eq!(json["op"], m.op());
    }

    #[test]
    fn set_property_json() {
        let m = Mutation::SetProperty {
            view: 2,
            tag: "width".into(),
            value: Value::Size(Size::px(32.0)),
        };
        insta::assert_snapshot!(
            m.to_json().unwrap(),
            @r#"{"op":"set-property","view":2,"tag":"width","value":{"kind":"size","payload":{"value":32.0,"unit":"px"}}}"#
        );
    }

    #[test]
    fn create_view_omits_missing_id() {
        let m = Mutation::CreateView {
            view: 1,
            parent: None,
            position: 0,
            kind: "View".into(),
            id: None,
            props: BTreeMap::new(),
        };
        insta::assert_snapshot!(
            m.to_json().unwrap(),
            @r#"{"op":"create-view","view":1,"parent":null,"position":0,"kind":"View","props":{}}"#
        );
    }
}
